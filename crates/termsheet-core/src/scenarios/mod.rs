pub mod scenario;
pub mod sweep;

pub use scenario::{
    analyze_scenarios, compare, compare_with_policy, validate_scenario, ExitScenario,
    ScenarioComparisonInput, ScenarioComparisonOutput, ScenarioOutcome, ScenarioSet,
};
#[cfg(feature = "parallel")]
pub use scenario::compare_par;
pub use sweep::{analyze_exit_curve, exit_curve, CurvePoint, ExitCurveInput, ExitCurveOutput, ExitRange};
