use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::terms::deal::{Compounding, DealTerms, DividendTerms};
use crate::types::{pct_to_rate, Money, Years};

/// The amount the investor class is owed ahead of common at a given horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceStack {
    /// `investment_amount * multiple`
    pub liquidation_amount: Money,
    /// Cumulative dividends accrued over the holding period
    pub accrued_dividends: Money,
    /// `liquidation_amount + accrued_dividends`
    pub total: Money,
}

/// Build the preference stack for a holding period.
///
/// Returns `None` only when the arithmetic leaves Decimal range (e.g. a
/// compound accrual over an absurd horizon); callers surface that as
/// insufficient data.
pub fn preference_stack(terms: &DealTerms, years_to_exit: Years) -> Option<PreferenceStack> {
    let pref = &terms.liquidation_preference;
    let liquidation_amount = terms
        .investment_amount
        .checked_mul(pref.effective_multiple())?;
    let accrued_dividends = accrued_dividends(
        terms.investment_amount,
        pref.dividends.as_ref(),
        years_to_exit,
    )?;
    let total = liquidation_amount.checked_add(accrued_dividends)?;

    Some(PreferenceStack {
        liquidation_amount,
        accrued_dividends,
        total,
    })
}

/// Dividends accrued on `investment` after `years`.
pub fn accrued_dividends(
    investment: Money,
    dividends: Option<&DividendTerms>,
    years: Years,
) -> Option<Money> {
    let Some(div) = dividends else {
        return Some(Decimal::ZERO);
    };
    let rate = pct_to_rate(div.rate_pct);

    match div.compounding {
        Compounding::None => Some(Decimal::ZERO),
        Compounding::Simple => investment.checked_mul(rate)?.checked_mul(years),
        Compounding::Compound => {
            let growth = growth_factor(Decimal::ONE.checked_add(rate)?, years)?;
            investment.checked_mul(growth.checked_sub(Decimal::ONE)?)
        }
    }
}

/// `base^years`, exact for whole years.
fn growth_factor(base: Decimal, years: Years) -> Option<Decimal> {
    if years >= Decimal::ZERO && years.fract().is_zero() {
        base.checked_powu(years.to_u64()?)
    } else {
        base.checked_powd(years)
    }
}
