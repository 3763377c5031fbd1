use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::distribution::{distribute_with_policy, ProceedsPolicy, WaterfallResult};
use crate::error::TermSheetError;
use crate::terms::{consistency_warnings, validate_exit, validate_terms, DealTerms};
use crate::types::*;
use crate::TermSheetResult;

/// Horizon used for the standard presets when none is given.
const DEFAULT_PRESET_YEARS: Years = dec!(5);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named (exit valuation, holding period) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitScenario {
    pub name: String,
    #[serde(alias = "exitValuation")]
    pub exit_valuation: Money,
    #[serde(alias = "yearsToExit")]
    pub years_to_exit: Years,
}

impl ExitScenario {
    pub fn new(name: impl Into<String>, exit_valuation: Money, years_to_exit: Years) -> Self {
        Self {
            name: name.into(),
            exit_valuation,
            years_to_exit,
        }
    }
}

/// Ordered set of exit scenarios for side-by-side comparison.
///
/// Order is display order only. Which scenario is highlighted belongs to the
/// caller, which can hold the position returned by [`ScenarioSet::push`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioSet {
    scenarios: Vec<ExitScenario>,
}

impl ScenarioSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downside, flat, base and upside exits expressed as multiples of the
    /// post-money valuation. Fails when an exit overflows.
    pub fn standard(post_money_valuation: Money, years_to_exit: Years) -> TermSheetResult<Self> {
        [
            ("Downside (0.5x post-money)", dec!(0.5)),
            ("Flat (1x post-money)", dec!(1)),
            ("Base (3x post-money)", dec!(3)),
            ("Upside (10x post-money)", dec!(10)),
        ]
        .into_iter()
        .map(|(name, multiple)| -> TermSheetResult<ExitScenario> {
            let exit = post_money_valuation.checked_mul(multiple).ok_or_else(|| {
                TermSheetError::InvalidInput {
                    field: "post_money_valuation".into(),
                    reason: format!("{name} exit overflows"),
                }
            })?;
            Ok(ExitScenario::new(name, exit, years_to_exit))
        })
        .collect()
    }

    /// Append a scenario and return its position.
    pub fn push(&mut self, scenario: ExitScenario) -> usize {
        self.scenarios.push(scenario);
        self.scenarios.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<ExitScenario> {
        (index < self.scenarios.len()).then(|| self.scenarios.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&ExitScenario> {
        self.scenarios.get(index)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExitScenario> {
        self.scenarios.iter()
    }

    pub fn as_slice(&self) -> &[ExitScenario] {
        &self.scenarios
    }

    /// Run the distribution for every scenario, in order.
    pub fn compare(&self, terms: &DealTerms) -> Vec<ScenarioOutcome> {
        compare(terms, &self.scenarios)
    }
}

impl FromIterator<ExitScenario> for ScenarioSet {
    fn from_iter<I: IntoIterator<Item = ExitScenario>>(iter: I) -> Self {
        Self {
            scenarios: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ScenarioSet {
    type Item = &'a ExitScenario;
    type IntoIter = std::slice::Iter<'a, ExitScenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}

/// One row of a scenario comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    #[serde(flatten)]
    pub scenario: ExitScenario,
    #[serde(flatten)]
    pub result: WaterfallResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonInput {
    pub terms: DealTerms,
    /// Scenarios to compare. When empty, the standard presets are built from
    /// the post-money valuation.
    #[serde(default)]
    pub scenarios: Vec<ExitScenario>,
    /// Holding period for the standard presets (default 5 years)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_years: Option<Years>,
    #[serde(default)]
    pub proceeds_policy: ProceedsPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonOutput {
    pub outcomes: Vec<ScenarioOutcome>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

fn evaluate(terms: &DealTerms, scenario: &ExitScenario, policy: ProceedsPolicy) -> ScenarioOutcome {
    ScenarioOutcome {
        scenario: scenario.clone(),
        result: distribute_with_policy(
            terms,
            scenario.exit_valuation,
            scenario.years_to_exit,
            policy,
        ),
    }
}

/// Distribute proceeds for each scenario. Output order matches input order.
pub fn compare(terms: &DealTerms, scenarios: &[ExitScenario]) -> Vec<ScenarioOutcome> {
    compare_with_policy(terms, scenarios, ProceedsPolicy::Unclamped)
}

pub fn compare_with_policy(
    terms: &DealTerms,
    scenarios: &[ExitScenario],
    policy: ProceedsPolicy,
) -> Vec<ScenarioOutcome> {
    scenarios
        .iter()
        .map(|s| evaluate(terms, s, policy))
        .collect()
}

/// Parallel [`compare_with_policy`]; results are identical and in input order.
#[cfg(feature = "parallel")]
pub fn compare_par(
    terms: &DealTerms,
    scenarios: &[ExitScenario],
    policy: ProceedsPolicy,
) -> Vec<ScenarioOutcome> {
    scenarios
        .par_iter()
        .map(|s| evaluate(terms, s, policy))
        .collect()
}

/// Reject a negative exit or horizon, naming the scenario in the error field.
pub fn validate_scenario(scenario: &ExitScenario) -> TermSheetResult<()> {
    validate_exit(scenario.exit_valuation, scenario.years_to_exit).map_err(|e| match e {
        TermSheetError::InvalidInput { field, reason } => TermSheetError::InvalidInput {
            field: format!("scenario:{} {field}", scenario.name),
            reason,
        },
        other => other,
    })
}

/// Validate, compare every scenario, and wrap with warnings and metadata.
pub fn analyze_scenarios(
    input: &ScenarioComparisonInput,
) -> TermSheetResult<ComputationOutput<ScenarioComparisonOutput>> {
    let start = Instant::now();

    validate_terms(&input.terms)?;
    let mut warnings = consistency_warnings(&input.terms);

    let scenarios: Vec<ExitScenario> = if input.scenarios.is_empty() {
        let post_money = input.terms.post_money_valuation.ok_or_else(|| {
            TermSheetError::InsufficientData(
                "No scenarios given and no post-money valuation to build presets from".into(),
            )
        })?;
        let years = input.preset_years.unwrap_or(DEFAULT_PRESET_YEARS);
        warnings.push(format!(
            "No scenarios given; using standard presets over {years} years"
        ));
        ScenarioSet::standard(post_money, years)?.as_slice().to_vec()
    } else {
        input.scenarios.clone()
    };

    for s in &scenarios {
        validate_scenario(s)?;
    }

    tracing::debug!(count = scenarios.len(), "comparing exit scenarios");

    #[cfg(feature = "parallel")]
    let outcomes = compare_par(&input.terms, &scenarios, input.proceeds_policy);
    #[cfg(not(feature = "parallel"))]
    let outcomes = compare_with_policy(&input.terms, &scenarios, input.proceeds_policy);

    for o in &outcomes {
        match o.result.investor_return {
            Some(investor) if investor > o.scenario.exit_valuation => warnings.push(format!(
                "Scenario '{}': investor claim exceeds exit valuation",
                o.scenario.name
            )),
            Some(_) => {}
            None => warnings.push(format!(
                "Scenario '{}': insufficient data to split proceeds",
                o.scenario.name
            )),
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit Scenario Comparison",
        &serde_json::json!({
            "investment_amount": input.terms.investment_amount.to_string(),
            "preference_type": input.terms.liquidation_preference.preference_type,
            "num_scenarios": scenarios.len(),
            "proceeds_policy": input.proceeds_policy,
        }),
        warnings,
        elapsed,
        ScenarioComparisonOutput { outcomes },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::{LiquidationPreference, PreferenceType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn seed_terms() -> DealTerms {
        DealTerms {
            investment_amount: dec!(2000000),
            pre_money_valuation: Some(dec!(8000000)),
            post_money_valuation: Some(dec!(10000000)),
            investor_ownership_pct: Some(dec!(20)),
            option_pool_pct: Some(dec!(10)),
            liquidation_preference: LiquidationPreference {
                multiple: Some(dec!(1)),
                preference_type: PreferenceType::Participating,
                participation_cap_multiple: None,
                dividends: None,
            },
        }
    }

    #[test]
    fn test_standard_presets() {
        let set = ScenarioSet::standard(dec!(10000000), dec!(4)).unwrap();
        assert_eq!(set.len(), 4);
        let exits: Vec<Money> = set.iter().map(|s| s.exit_valuation).collect();
        assert_eq!(
            exits,
            vec![dec!(5000000), dec!(10000000), dec!(30000000), dec!(100000000)]
        );
        assert!(set.iter().all(|s| s.years_to_exit == dec!(4)));
    }

    #[test]
    fn test_push_returns_position() {
        let mut set = ScenarioSet::new();
        assert!(set.is_empty());
        assert_eq!(set.push(ExitScenario::new("a", dec!(1), dec!(1))), 0);
        assert_eq!(set.push(ExitScenario::new("b", dec!(2), dec!(1))), 1);
        assert_eq!(set.get(1).unwrap().name, "b");
        assert_eq!(set.remove(0).unwrap().name, "a");
        assert!(set.remove(5).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_compare_preserves_order() {
        let set: ScenarioSet = vec![
            ExitScenario::new("high", dec!(50000000), dec!(5)),
            ExitScenario::new("low", dec!(1000000), dec!(5)),
            ExitScenario::new("mid", dec!(10000000), dec!(5)),
        ]
        .into_iter()
        .collect();
        let outcomes = set.compare(&seed_terms());
        let names: Vec<&str> = outcomes.iter().map(|o| o.scenario.name.as_str()).collect();
        assert_eq!(names, vec!["high", "low", "mid"]);
        // mid: 2M + 20% * 8M = 3.6M
        assert_eq!(outcomes[2].result.investor_return, Some(dec!(3600000)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_compare_par_matches_sequential() {
        let scenarios: Vec<ExitScenario> = (1..=50)
            .map(|i| ExitScenario::new(format!("s{i}"), Decimal::from(i) * dec!(1000000), dec!(3)))
            .collect();
        let terms = seed_terms();
        assert_eq!(
            compare_par(&terms, &scenarios, ProceedsPolicy::Unclamped),
            compare(&terms, &scenarios)
        );
    }

    #[test]
    fn test_analyze_uses_presets_when_empty() {
        let input = ScenarioComparisonInput {
            terms: seed_terms(),
            scenarios: Vec::new(),
            preset_years: None,
            proceeds_policy: ProceedsPolicy::Unclamped,
        };
        let out = analyze_scenarios(&input).unwrap();
        assert_eq!(out.result.outcomes.len(), 4);
        assert!(out.result.outcomes.iter().all(|o| o.scenario.years_to_exit == dec!(5)));
        assert!(out.warnings.iter().any(|w| w.contains("standard presets")));
    }

    #[test]
    fn test_analyze_without_post_money_or_scenarios() {
        let mut terms = seed_terms();
        terms.post_money_valuation = None;
        let input = ScenarioComparisonInput {
            terms,
            scenarios: Vec::new(),
            preset_years: None,
            proceeds_policy: ProceedsPolicy::Unclamped,
        };
        assert!(matches!(
            analyze_scenarios(&input),
            Err(TermSheetError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_standard_presets_reject_overflow() {
        match ScenarioSet::standard(Decimal::MAX, dec!(5)).unwrap_err() {
            TermSheetError::InvalidInput { field, .. } => assert_eq!(field, "post_money_valuation"),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_analyze_presets_overflow_is_an_error() {
        let mut terms = seed_terms();
        terms.post_money_valuation = Some(Decimal::MAX);
        let input = ScenarioComparisonInput {
            terms,
            scenarios: Vec::new(),
            preset_years: None,
            proceeds_policy: ProceedsPolicy::Unclamped,
        };
        assert!(matches!(
            analyze_scenarios(&input),
            Err(TermSheetError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_validate_scenario_prefixes_name() {
        assert!(validate_scenario(&ExitScenario::new("Ok", dec!(1), dec!(1))).is_ok());
        match validate_scenario(&ExitScenario::new("Late", dec!(1), dec!(-1))).unwrap_err() {
            TermSheetError::InvalidInput { field, .. } => {
                assert_eq!(field, "scenario:Late years_to_exit")
            }
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_analyze_names_bad_scenario() {
        let input = ScenarioComparisonInput {
            terms: seed_terms(),
            scenarios: vec![ExitScenario::new("Broken", dec!(-5), dec!(1))],
            preset_years: None,
            proceeds_policy: ProceedsPolicy::Unclamped,
        };
        match analyze_scenarios(&input).unwrap_err() {
            TermSheetError::InvalidInput { field, .. } => {
                assert_eq!(field, "scenario:Broken exit_valuation")
            }
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = compare(
            &seed_terms(),
            &[ExitScenario::new("Flat", dec!(10000000), dec!(5))],
        )
        .remove(0);
        let value = serde_json::to_value(&outcome).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("exit_valuation"));
        assert!(obj.contains_key("investor_return"));
        assert!(obj.contains_key("founder_pct"));
    }
}
