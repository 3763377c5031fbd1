use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::terms::{consistency_warnings, preference_stack, validate_terms};
use crate::terms::{DealTerms, PreferenceType};
use crate::types::*;
use crate::TermSheetResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostOfCapitalInput {
    pub terms: DealTerms,
    /// Holding period over which the preference is annualized
    pub years_to_exit: Years,
}

/// The preference stack priced as if it were a debt instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOfCapitalResult {
    /// Simple annualization of the preference multiple, in points
    pub effective_apr: Option<Percent>,
    /// Lowest exit value at which founder proceeds are non-negative
    pub break_even_exit: Option<Money>,
    /// Ownership given up plus preference, relative to the investment, in points
    pub true_dilution_cost: Option<Percent>,
    pub total_preference_amount: Option<Money>,
    /// Compounding annualization of the same multiple, in points
    pub preference_irr: Option<Percent>,
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Effective cost of the preference stack held for `years_to_exit`.
///
/// `effective_apr` is `(total_preference / investment - 1) / years`, a simple
/// annualization of the multiple, not an IRR solve. The compounding
/// equivalent is reported separately as `preference_irr`.
///
/// Never fails; fields that cannot be computed (zero horizon, missing
/// ownership or post-money, zero ownership for a non-participating
/// break-even) are `None`.
pub fn cost_of_capital(terms: &DealTerms, years_to_exit: Years) -> CostOfCapitalResult {
    let total = preference_stack(terms, years_to_exit).map(|s| s.total);
    let moic = total.and_then(|t| t.checked_div(terms.investment_amount));

    let effective_apr = moic
        .and_then(|m| m.checked_sub(Decimal::ONE)?.checked_div(years_to_exit))
        .and_then(|r| r.checked_mul(HUNDRED));

    let true_dilution_cost = total.and_then(|t| {
        let ownership_value = terms.post_money_valuation?.checked_mul(terms.ownership_rate()?)?;
        let cost = ownership_value.checked_add(t)?.checked_div(terms.investment_amount)?;
        cost.checked_sub(Decimal::ONE)?.checked_mul(HUNDRED)
    });

    let explanation = explain(terms, years_to_exit, effective_apr);

    CostOfCapitalResult {
        effective_apr,
        break_even_exit: total.and_then(|t| break_even_exit(terms, t)),
        true_dilution_cost,
        total_preference_amount: total,
        preference_irr: preference_irr(terms, years_to_exit),
        explanation,
    }
}

/// Exit valuation at which founder proceeds stop being negative, for a given
/// preference stack `total_preference`.
///
/// * non-participating: `max(total, total / own)`; `None` for zero ownership
/// * participating: `total / (1 - own)`; `None` for 100% ownership
/// * capped participating: `min(total, investment * cap)`; below that the
///   capped claim exceeds the exit
/// * none: zero, the pro-rata founder share is never negative
pub fn break_even_exit(terms: &DealTerms, total_preference: Money) -> Option<Money> {
    match terms.liquidation_preference.preference_type {
        PreferenceType::NonParticipating => {
            let converted = total_preference.checked_div(terms.ownership_rate()?)?;
            Some(total_preference.max(converted))
        }
        PreferenceType::Participating => {
            total_preference.checked_div(Decimal::ONE.checked_sub(terms.ownership_rate()?)?)
        }
        PreferenceType::CappedParticipating => {
            Some(total_preference.min(terms.participation_cap_amount()?))
        }
        PreferenceType::None => Some(Decimal::ZERO),
    }
}

/// Compound annual rate that grows the investment into the preference stack:
/// `((total / investment)^(1 / years) - 1) * 100`.
pub fn preference_irr(terms: &DealTerms, years_to_exit: Years) -> Option<Percent> {
    if years_to_exit <= Decimal::ZERO {
        return None;
    }
    let total = preference_stack(terms, years_to_exit)?.total;
    let moic = total.checked_div(terms.investment_amount)?;
    if moic.is_zero() {
        return Some(-HUNDRED);
    }
    let exponent = Decimal::ONE.checked_div(years_to_exit)?;
    let growth = moic.checked_powd(exponent)?;
    growth.checked_sub(Decimal::ONE)?.checked_mul(HUNDRED)
}

fn explain(terms: &DealTerms, years_to_exit: Years, effective_apr: Option<Percent>) -> String {
    let pref = &terms.liquidation_preference;
    let dividends = match &pref.dividends {
        Some(d) if !d.rate_pct.is_zero() => {
            format!("{}% {} dividends", d.rate_pct.normalize(), d.compounding)
        }
        _ => "no accruing dividends".to_string(),
    };
    let structure = format!(
        "A {}x {} liquidation preference with {}",
        pref.effective_multiple().normalize(),
        pref.preference_type,
        dividends
    );

    match effective_apr {
        Some(apr) => format!(
            "{structure} costs the equivalent of {:.2}% per year (simple APR) on capital \
             held for {} years.",
            apr,
            years_to_exit.normalize()
        ),
        None => format!(
            "{structure} cannot be annualized over a {}-year horizon.",
            years_to_exit.normalize()
        ),
    }
}

/// Validate inputs, price the preference, and wrap with warnings and metadata.
pub fn analyze_cost_of_capital(
    input: &CostOfCapitalInput,
) -> TermSheetResult<ComputationOutput<CostOfCapitalResult>> {
    let start = Instant::now();

    validate_terms(&input.terms)?;
    if input.years_to_exit < Decimal::ZERO {
        return Err(crate::error::TermSheetError::InvalidInput {
            field: "years_to_exit".into(),
            reason: "Years to exit cannot be negative".into(),
        });
    }
    let mut warnings = consistency_warnings(&input.terms);

    tracing::debug!(
        years_to_exit = %input.years_to_exit,
        preference_type = %input.terms.liquidation_preference.preference_type,
        "pricing preference stack"
    );

    let result = cost_of_capital(&input.terms, input.years_to_exit);

    if input.years_to_exit.is_zero() {
        warnings.push("Zero holding period; APR and IRR are undefined".into());
    }
    if result.break_even_exit.is_none() {
        warnings.push("Break-even exit is unbounded or lacks the inputs to compute".into());
    }
    if result.true_dilution_cost.is_none() {
        warnings.push(
            "True dilution cost needs both post-money valuation and investor ownership".into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Preference Stack Cost of Capital (simple APR)",
        &serde_json::json!({
            "investment_amount": input.terms.investment_amount.to_string(),
            "preference_type": input.terms.liquidation_preference.preference_type,
            "multiple": input.terms.liquidation_preference.effective_multiple().to_string(),
            "years_to_exit": input.years_to_exit.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
