use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::terms::{consistency_warnings, preference_stack, validate_exit, validate_terms};
use crate::terms::{DealTerms, PreferenceType};
use crate::types::*;
use crate::TermSheetResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// What happens when the preference stack exceeds the exit proceeds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProceedsPolicy {
    /// Investor return is the contractual claim and may exceed the exit value.
    #[default]
    Unclamped,
    /// Investor return is limited to the exit value; founder return is never negative.
    ClampToExit,
}

/// Input for a single exit distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionInput {
    pub terms: DealTerms,
    /// Company value at exit
    pub exit_valuation: Money,
    /// Holding period used for dividend accrual
    pub years_to_exit: Years,
    #[serde(default)]
    pub proceeds_policy: ProceedsPolicy,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Split of exit proceeds between the investor class and founders/common.
///
/// `None` in any field means the inputs were insufficient to compute it
/// (missing ownership, missing cap, zero investment or zero exit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterfallResult {
    pub investor_return: Option<Money>,
    pub founder_return: Option<Money>,
    /// `investor_return / investment_amount`
    pub investor_multiple: Option<Multiple>,
    /// Founder share of the exit valuation, in points
    pub founder_pct: Option<Percent>,
    /// Liquidation amount plus accrued dividends at this horizon
    pub total_preference: Option<Money>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Split `exit_valuation` between investor and founders at `years_to_exit`.
///
/// Never fails. Preconditions (`investment_amount > 0`, non-negative exit and
/// horizon) are the caller's responsibility; when they are violated, or an
/// input the branch needs is absent, the affected fields are `None`.
///
/// The investor return is not clamped to the exit value: below the
/// preference stack the investor's claim exceeds what is available. Use
/// [`distribute_with_policy`] with [`ProceedsPolicy::ClampToExit`] for the
/// cash-constrained split.
pub fn distribute(
    terms: &DealTerms,
    exit_valuation: Money,
    years_to_exit: Years,
) -> WaterfallResult {
    distribute_with_policy(terms, exit_valuation, years_to_exit, ProceedsPolicy::Unclamped)
}

/// [`distribute`] with an explicit policy for under-water exits.
pub fn distribute_with_policy(
    terms: &DealTerms,
    exit_valuation: Money,
    years_to_exit: Years,
    policy: ProceedsPolicy,
) -> WaterfallResult {
    let total_preference = preference_stack(terms, years_to_exit).map(|s| s.total);

    let split = total_preference
        .and_then(|total| split_proceeds(terms, exit_valuation, total))
        .and_then(|(investor, founder)| match policy {
            ProceedsPolicy::Unclamped => Some((investor, founder)),
            ProceedsPolicy::ClampToExit => {
                let investor = investor.min(exit_valuation).max(Decimal::ZERO);
                Some((investor, exit_valuation.checked_sub(investor)?))
            }
        });

    let investor_return = split.map(|(investor, _)| investor);
    let founder_return = split.map(|(_, founder)| founder);

    WaterfallResult {
        investor_return,
        founder_return,
        investor_multiple: investor_return
            .and_then(|r| r.checked_div(terms.investment_amount)),
        founder_pct: founder_return
            .and_then(|r| r.checked_mul(HUNDRED))
            .and_then(|r| r.checked_div(exit_valuation)),
        total_preference,
    }
}

/// Branch on preference type. Returns `(investor, founder)`.
fn split_proceeds(terms: &DealTerms, exit: Money, total: Money) -> Option<(Money, Money)> {
    let own = terms.ownership_rate();

    match terms.liquidation_preference.preference_type {
        PreferenceType::NonParticipating => {
            let as_converted = exit.checked_mul(own?)?;
            // Equality elects the preference: same value either way.
            let investor = if as_converted > total { as_converted } else { total };
            Some((investor, exit.checked_sub(investor)?))
        }
        PreferenceType::Participating => participating_split(exit, total, own),
        PreferenceType::CappedParticipating => {
            let (uncapped, _) = participating_split(exit, total, own)?;
            let investor = uncapped.min(terms.participation_cap_amount()?);
            Some((investor, exit.checked_sub(investor)?))
        }
        PreferenceType::None => {
            let investor = exit.checked_mul(own?)?;
            Some((investor, exit.checked_sub(investor)?))
        }
    }
}

/// Preference first, then pro-rata participation in whatever is left.
fn participating_split(exit: Money, total: Money, own: Option<Rate>) -> Option<(Money, Money)> {
    let remainder = exit.checked_sub(total)?;
    if remainder > Decimal::ZERO {
        let participation = remainder.checked_mul(own?)?;
        Some((
            total.checked_add(participation)?,
            remainder.checked_sub(participation)?,
        ))
    } else {
        Some((total, Decimal::ZERO))
    }
}

/// Validate inputs, distribute, and wrap the result with warnings and metadata.
pub fn analyze_distribution(
    input: &DistributionInput,
) -> TermSheetResult<ComputationOutput<WaterfallResult>> {
    let start = Instant::now();

    // --- Validation ---
    validate_terms(&input.terms)?;
    validate_exit(input.exit_valuation, input.years_to_exit)?;
    let mut warnings = consistency_warnings(&input.terms);

    tracing::debug!(
        exit_valuation = %input.exit_valuation,
        years_to_exit = %input.years_to_exit,
        preference_type = %input.terms.liquidation_preference.preference_type,
        "distributing exit proceeds"
    );

    let result = distribute_with_policy(
        &input.terms,
        input.exit_valuation,
        input.years_to_exit,
        input.proceeds_policy,
    );

    match result.investor_return {
        Some(investor) if investor > input.exit_valuation => warnings.push(format!(
            "Investor claim {investor} exceeds exit valuation {}; founder return is negative",
            input.exit_valuation
        )),
        Some(_) => {}
        None => warnings.push(
            "Insufficient data to split proceeds for this preference structure".into(),
        ),
    }
    if input.exit_valuation.is_zero() {
        warnings.push("Exit valuation is zero; founder percentage is undefined".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Liquidation Preference Waterfall",
        &serde_json::json!({
            "investment_amount": input.terms.investment_amount.to_string(),
            "preference_type": input.terms.liquidation_preference.preference_type,
            "multiple": input.terms.liquidation_preference.effective_multiple().to_string(),
            "exit_valuation": input.exit_valuation.to_string(),
            "years_to_exit": input.years_to_exit.to_string(),
            "proceeds_policy": input.proceeds_policy,
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
