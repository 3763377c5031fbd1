use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::TermSheetError;
use crate::terms::deal::{DealTerms, PreferenceType};
use crate::types::{Money, Percent, Years, HUNDRED};
use crate::TermSheetResult;

/// Relative gap between post-money and pre-money + investment tolerated
/// before a warning is raised.
const VALUATION_TOLERANCE: Decimal = dec!(0.005);

/// Gap in percentage points between stated and implied ownership tolerated
/// before a warning is raised.
const OWNERSHIP_TOLERANCE_PTS: Decimal = dec!(1);

fn invalid(field: &str, reason: &str) -> TermSheetError {
    TermSheetError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

fn check_non_negative(field: &str, value: Option<Decimal>) -> TermSheetResult<()> {
    match value {
        Some(v) if v < Decimal::ZERO => Err(invalid(field, "Cannot be negative")),
        _ => Ok(()),
    }
}

fn check_percent(field: &str, value: Option<Percent>) -> TermSheetResult<()> {
    match value {
        Some(v) if v < Decimal::ZERO || v > HUNDRED => {
            Err(invalid(field, "Must be between 0 and 100"))
        }
        _ => Ok(()),
    }
}

/// Check the per-field ranges the calculators rely on.
///
/// Cross-field consistency (ownership vs. valuation, pool vs. ownership) is
/// not an error; see [`consistency_warnings`].
pub fn validate_terms(terms: &DealTerms) -> TermSheetResult<()> {
    if terms.investment_amount <= Decimal::ZERO {
        return Err(invalid(
            "investment_amount",
            "Investment amount must be positive",
        ));
    }
    check_non_negative("pre_money_valuation", terms.pre_money_valuation)?;
    check_non_negative("post_money_valuation", terms.post_money_valuation)?;
    check_percent("investor_ownership_pct", terms.investor_ownership_pct)?;
    check_percent("option_pool_pct", terms.option_pool_pct)?;

    let pref = &terms.liquidation_preference;
    check_non_negative("liquidation_preference.multiple", pref.multiple)?;
    check_non_negative(
        "liquidation_preference.participation_cap_multiple",
        pref.participation_cap_multiple,
    )?;
    if let Some(div) = &pref.dividends {
        check_non_negative("liquidation_preference.dividends.rate_pct", Some(div.rate_pct))?;
    }

    Ok(())
}

/// Check an (exit valuation, holding period) pair.
pub fn validate_exit(exit_valuation: Money, years_to_exit: Years) -> TermSheetResult<()> {
    if exit_valuation < Decimal::ZERO {
        return Err(invalid("exit_valuation", "Exit valuation cannot be negative"));
    }
    if years_to_exit < Decimal::ZERO {
        return Err(invalid("years_to_exit", "Years to exit cannot be negative"));
    }
    Ok(())
}

/// Flag cross-field inconsistencies an extraction step may have produced.
///
/// These never block a calculation.
pub fn consistency_warnings(terms: &DealTerms) -> Vec<String> {
    let mut warnings = Vec::new();
    let pref = &terms.liquidation_preference;

    match terms.investor_ownership_pct {
        None => warnings.push(
            "Investor ownership not stated; pro-rata results will be unavailable".into(),
        ),
        Some(own) => {
            if let Some(pool) = terms.option_pool_pct {
                if own + pool > HUNDRED {
                    warnings.push(format!(
                        "Investor ownership ({own}%) plus option pool ({pool}%) exceeds 100%"
                    ));
                }
            }
            if let Some(post) = terms.post_money_valuation.filter(|p| !p.is_zero()) {
                let implied = terms.investment_amount / post * HUNDRED;
                if (implied - own).abs() > OWNERSHIP_TOLERANCE_PTS {
                    warnings.push(format!(
                        "Stated ownership {own}% differs from implied ownership {:.2}% \
                         (investment / post-money)",
                        implied
                    ));
                }
            }
        }
    }

    if let (Some(pre), Some(post)) = (terms.pre_money_valuation, terms.post_money_valuation) {
        let expected = pre + terms.investment_amount;
        if !post.is_zero() && ((post - expected) / post).abs() > VALUATION_TOLERANCE {
            warnings.push(format!(
                "Post-money valuation {post} does not equal pre-money {pre} plus investment {}",
                terms.investment_amount
            ));
        }
    }

    if pref.multiple.is_none() {
        warnings.push("Liquidation preference multiple not stated; assuming 1x".into());
    }

    match (pref.preference_type, pref.participation_cap_multiple) {
        (PreferenceType::CappedParticipating, None) => warnings.push(
            "Capped participation without a cap multiple; investor proceeds cannot be computed"
                .into(),
        ),
        (PreferenceType::CappedParticipating, Some(cap)) if cap < pref.effective_multiple() => {
            warnings.push(format!(
                "Participation cap {cap}x is below the liquidation multiple {}x",
                pref.effective_multiple()
            ))
        }
        (PreferenceType::CappedParticipating, Some(_)) | (_, None) => {}
        (other, Some(_)) => warnings.push(format!(
            "Participation cap ignored for {other} preference"
        )),
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::deal::{Compounding, DividendTerms, LiquidationPreference};
    use rust_decimal_macros::dec;

    fn base_terms() -> DealTerms {
        DealTerms {
            investment_amount: dec!(5000000),
            pre_money_valuation: Some(dec!(20000000)),
            post_money_valuation: Some(dec!(25000000)),
            investor_ownership_pct: Some(dec!(20)),
            option_pool_pct: Some(dec!(10)),
            liquidation_preference: LiquidationPreference {
                multiple: Some(dec!(1)),
                preference_type: PreferenceType::NonParticipating,
                participation_cap_multiple: None,
                dividends: None,
            },
        }
    }

    fn invalid_field(terms: &DealTerms) -> String {
        match validate_terms(terms).unwrap_err() {
            TermSheetError::InvalidInput { field, .. } => field,
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_valid_terms() {
        assert!(validate_terms(&base_terms()).is_ok());
        assert!(consistency_warnings(&base_terms()).is_empty());
    }

    #[test]
    fn test_zero_investment_rejected() {
        let mut terms = base_terms();
        terms.investment_amount = Decimal::ZERO;
        assert_eq!(invalid_field(&terms), "investment_amount");
    }

    #[test]
    fn test_ownership_out_of_range() {
        let mut terms = base_terms();
        terms.investor_ownership_pct = Some(dec!(120));
        assert_eq!(invalid_field(&terms), "investor_ownership_pct");
    }

    #[test]
    fn test_negative_pool_rejected() {
        let mut terms = base_terms();
        terms.option_pool_pct = Some(dec!(-1));
        assert_eq!(invalid_field(&terms), "option_pool_pct");
    }

    #[test]
    fn test_negative_multiple_rejected() {
        let mut terms = base_terms();
        terms.liquidation_preference.multiple = Some(dec!(-1));
        assert_eq!(invalid_field(&terms), "liquidation_preference.multiple");
    }

    #[test]
    fn test_negative_dividend_rate_rejected() {
        let mut terms = base_terms();
        terms.liquidation_preference.dividends = Some(DividendTerms {
            rate_pct: dec!(-8),
            compounding: Compounding::Simple,
        });
        assert_eq!(
            invalid_field(&terms),
            "liquidation_preference.dividends.rate_pct"
        );
    }

    #[test]
    fn test_validate_exit() {
        assert!(validate_exit(dec!(0), dec!(0)).is_ok());
        assert!(validate_exit(dec!(-1), dec!(5)).is_err());
        assert!(validate_exit(dec!(100), dec!(-0.5)).is_err());
    }

    #[test]
    fn test_missing_ownership_is_not_an_error() {
        let mut terms = base_terms();
        terms.investor_ownership_pct = None;
        assert!(validate_terms(&terms).is_ok());
        let warnings = consistency_warnings(&terms);
        assert!(warnings.iter().any(|w| w.contains("ownership not stated")));
    }

    #[test]
    fn test_ownership_plus_pool_over_100() {
        let mut terms = base_terms();
        terms.investor_ownership_pct = Some(dec!(95));
        terms.option_pool_pct = Some(dec!(10));
        terms.post_money_valuation = None;
        let warnings = consistency_warnings(&terms);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exceeds 100%"));
    }

    #[test]
    fn test_post_money_mismatch() {
        let mut terms = base_terms();
        terms.post_money_valuation = Some(dec!(30000000));
        terms.investor_ownership_pct = Some(dec!(16.67));
        let warnings = consistency_warnings(&terms);
        assert!(warnings.iter().any(|w| w.contains("does not equal pre-money")));
    }

    #[test]
    fn test_implied_ownership_mismatch() {
        let mut terms = base_terms();
        terms.investor_ownership_pct = Some(dec!(30));
        let warnings = consistency_warnings(&terms);
        assert!(warnings.iter().any(|w| w.contains("implied ownership")));
    }

    #[test]
    fn test_cap_warnings() {
        let mut terms = base_terms();
        terms.liquidation_preference.participation_cap_multiple = Some(dec!(3));
        let warnings = consistency_warnings(&terms);
        assert!(warnings
            .iter()
            .any(|w| w.contains("cap ignored for non-participating")));

        terms.liquidation_preference.preference_type = PreferenceType::CappedParticipating;
        terms.liquidation_preference.participation_cap_multiple = None;
        let warnings = consistency_warnings(&terms);
        assert!(warnings.iter().any(|w| w.contains("without a cap multiple")));
    }
}
