use napi::Result as NapiResult;
use napi_derive::napi;

use termsheet_core::cost_of_capital::{self, CostOfCapitalInput};
use termsheet_core::distribution::{self, DistributionInput};
use termsheet_core::scenarios::{self, ExitCurveInput, ScenarioComparisonInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

#[napi]
pub fn distribute(input_json: String) -> NapiResult<String> {
    let input: DistributionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = distribution::analyze_distribution(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cost of capital
// ---------------------------------------------------------------------------

#[napi]
pub fn cost_of_capital(input_json: String) -> NapiResult<String> {
    let input: CostOfCapitalInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cost_of_capital::analyze_cost_of_capital(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: ScenarioComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scenarios::analyze_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn exit_curve(input_json: String) -> NapiResult<String> {
    let input: ExitCurveInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scenarios::analyze_exit_curve(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
