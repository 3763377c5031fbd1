use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::distribution::{distribute_with_policy, ProceedsPolicy, WaterfallResult};
use crate::error::TermSheetError;
use crate::terms::{consistency_warnings, validate_exit, validate_terms, DealTerms};
use crate::types::*;
use crate::TermSheetResult;

/// Upper bound on points in one curve.
const MAX_CURVE_POINTS: usize = 10_000;

/// Range of exit valuations to sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitRange {
    pub min: Money,
    pub max: Money,
    pub step: Money,
}

/// One point on the payout curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub exit_valuation: Money,
    #[serde(flatten)]
    pub result: WaterfallResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitCurveInput {
    pub terms: DealTerms,
    pub years_to_exit: Years,
    pub range: ExitRange,
    #[serde(default)]
    pub proceeds_policy: ProceedsPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitCurveOutput {
    pub points: Vec<CurvePoint>,
    /// First swept exit at which the founder return is non-negative
    pub founder_break_even: Option<Money>,
}

/// Sweep values from min to max with step; max is always included.
fn sweep_values(range: &ExitRange) -> TermSheetResult<Vec<Money>> {
    if range.step <= Decimal::ZERO {
        return Err(TermSheetError::InvalidInput {
            field: "range.step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if range.min > range.max {
        return Err(TermSheetError::InvalidInput {
            field: "range.min".into(),
            reason: "Min must be <= max".into(),
        });
    }
    if range.min < Decimal::ZERO {
        return Err(TermSheetError::InvalidInput {
            field: "range.min".into(),
            reason: "Exit valuations cannot be negative".into(),
        });
    }

    let span = (range.max - range.min)
        .checked_div(range.step)
        .ok_or_else(|| TermSheetError::InvalidInput {
            field: "range.step".into(),
            reason: "Step is too small for this range".into(),
        })?;
    if span >= Decimal::from(MAX_CURVE_POINTS) {
        return Err(TermSheetError::InvalidInput {
            field: "range.step".into(),
            reason: format!("Range would produce more than {MAX_CURVE_POINTS} points"),
        });
    }
    let steps = span.floor().to_usize().unwrap_or(0);

    let mut values: Vec<Money> = Vec::with_capacity(steps + 2);
    for i in 0..=steps {
        let value = range
            .step
            .checked_mul(Decimal::from(i))
            .and_then(|offset| range.min.checked_add(offset))
            .filter(|v| *v <= range.max);
        let Some(value) = value else { break };
        if values.last().is_some_and(|last| value <= *last) {
            return Err(TermSheetError::InvalidInput {
                field: "range.step".into(),
                reason: "Step is below the precision of the exit valuations".into(),
            });
        }
        values.push(value);
    }
    if values.last().is_some_and(|last| *last < range.max) {
        values.push(range.max);
    }

    Ok(values)
}

/// Payout curve across a range of exit valuations at a fixed horizon.
pub fn exit_curve(
    terms: &DealTerms,
    years_to_exit: Years,
    range: &ExitRange,
    policy: ProceedsPolicy,
) -> TermSheetResult<Vec<CurvePoint>> {
    Ok(sweep_values(range)?
        .into_iter()
        .map(|exit_valuation| CurvePoint {
            exit_valuation,
            result: distribute_with_policy(terms, exit_valuation, years_to_exit, policy),
        })
        .collect())
}

pub fn analyze_exit_curve(
    input: &ExitCurveInput,
) -> TermSheetResult<ComputationOutput<ExitCurveOutput>> {
    let start = Instant::now();

    validate_terms(&input.terms)?;
    validate_exit(Decimal::ZERO, input.years_to_exit)?;
    let mut warnings = consistency_warnings(&input.terms);

    let points = exit_curve(
        &input.terms,
        input.years_to_exit,
        &input.range,
        input.proceeds_policy,
    )?;
    tracing::debug!(points = points.len(), "swept exit curve");

    let founder_break_even = points
        .iter()
        .find(|p| p.result.founder_return.is_some_and(|f| f >= Decimal::ZERO))
        .map(|p| p.exit_valuation);
    if points.iter().any(|p| p.result.investor_return.is_none()) {
        warnings.push("Some points lack the inputs to split proceeds".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit Valuation Payout Curve",
        &serde_json::json!({
            "investment_amount": input.terms.investment_amount.to_string(),
            "preference_type": input.terms.liquidation_preference.preference_type,
            "years_to_exit": input.years_to_exit.to_string(),
            "min": input.range.min.to_string(),
            "max": input.range.max.to_string(),
            "step": input.range.step.to_string(),
        }),
        warnings,
        elapsed,
        ExitCurveOutput {
            points,
            founder_break_even,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::{LiquidationPreference, PreferenceType};
    use rust_decimal_macros::dec;

    fn terms() -> DealTerms {
        DealTerms {
            investment_amount: dec!(10),
            pre_money_valuation: None,
            post_money_valuation: None,
            investor_ownership_pct: Some(dec!(20)),
            option_pool_pct: None,
            liquidation_preference: LiquidationPreference {
                multiple: Some(dec!(1)),
                preference_type: PreferenceType::NonParticipating,
                participation_cap_multiple: None,
                dividends: None,
            },
        }
    }

    fn range(min: Decimal, max: Decimal, step: Decimal) -> ExitRange {
        ExitRange { min, max, step }
    }

    #[test]
    fn test_sweep_includes_endpoints() {
        let values = sweep_values(&range(dec!(0), dec!(25), dec!(10))).unwrap();
        assert_eq!(values, vec![dec!(0), dec!(10), dec!(20), dec!(25)]);
    }

    #[test]
    fn test_sweep_single_point() {
        let values = sweep_values(&range(dec!(5), dec!(5), dec!(1))).unwrap();
        assert_eq!(values, vec![dec!(5)]);
    }

    #[test]
    fn test_sweep_rejects_bad_ranges() {
        assert!(sweep_values(&range(dec!(0), dec!(10), dec!(0))).is_err());
        assert!(sweep_values(&range(dec!(10), dec!(0), dec!(1))).is_err());
        assert!(sweep_values(&range(dec!(-10), dec!(0), dec!(1))).is_err());
        assert!(sweep_values(&range(dec!(0), dec!(1000000), dec!(1))).is_err());
    }

    #[test]
    fn test_sweep_rejects_step_below_precision() {
        // 1e27 carries 28 significant digits, so adding 0.01 rounds away
        let min = Decimal::from_str_exact("1000000000000000000000000000").unwrap();
        let max = min + dec!(10);
        match sweep_values(&range(min, max, dec!(0.01))).unwrap_err() {
            TermSheetError::InvalidInput { field, .. } => assert_eq!(field, "range.step"),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_sweep_rejects_overflowing_point_count() {
        let max = Decimal::from_str_exact("1000000000000000000000").unwrap();
        let step = Decimal::from_str_exact("0.0000000000001").unwrap();
        match sweep_values(&range(dec!(0), max, step)).unwrap_err() {
            TermSheetError::InvalidInput { field, .. } => assert_eq!(field, "range.step"),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_sweep_fractional_step() {
        let values = sweep_values(&range(dec!(1), dec!(2), dec!(0.4))).unwrap();
        assert_eq!(values, vec![dec!(1), dec!(1.4), dec!(1.8), dec!(2)]);
    }

    #[test]
    fn test_curve_tracks_conversion() {
        let points = exit_curve(
            &terms(),
            dec!(5),
            &range(dec!(0), dec!(100), dec!(25)),
            ProceedsPolicy::Unclamped,
        )
        .unwrap();
        let investor: Vec<Option<Money>> =
            points.iter().map(|p| p.result.investor_return).collect();
        // Preference of 10 until 20% of exit exceeds it at 50
        assert_eq!(
            investor,
            vec![
                Some(dec!(10)),
                Some(dec!(10)),
                Some(dec!(10)),
                Some(dec!(15)),
                Some(dec!(20)),
            ]
        );
    }

    #[test]
    fn test_analyze_exit_curve_break_even() {
        let input = ExitCurveInput {
            terms: terms(),
            years_to_exit: dec!(5),
            range: range(dec!(0), dec!(20), dec!(5)),
            proceeds_policy: ProceedsPolicy::Unclamped,
        };
        let out = analyze_exit_curve(&input).unwrap();
        assert_eq!(out.result.points.len(), 5);
        assert_eq!(out.result.founder_break_even, Some(dec!(10)));
    }
}
