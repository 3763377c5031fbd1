use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use termsheet_core::scenarios::{self, ExitCurveInput, ExitRange, ScenarioComparisonInput};
use termsheet_core::terms::DealTerms;

use crate::commands::waterfall::proceeds_policy;
use crate::input;

/// Arguments for exit scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON/YAML ScenarioComparisonInput (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML DealTerms document; compares the standard presets
    #[arg(long)]
    pub terms: Option<String>,

    /// Holding period for the standard presets
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Limit investor proceeds to the exit valuation
    #[arg(long)]
    pub clamp: bool,
}

/// Arguments for an exit valuation payout curve
#[derive(Args)]
pub struct ExitCurveArgs {
    /// Path to a JSON/YAML ExitCurveInput (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML DealTerms document
    #[arg(long)]
    pub terms: Option<String>,

    /// Lowest exit valuation
    #[arg(long, default_value = "0")]
    pub min: Decimal,

    /// Highest exit valuation
    #[arg(long)]
    pub max: Option<Decimal>,

    /// Exit valuation increment
    #[arg(long)]
    pub step: Option<Decimal>,

    /// Years from investment to exit
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Limit investor proceeds to the exit valuation
    #[arg(long)]
    pub clamp: bool,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: ScenarioComparisonInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(ref path) = args.terms {
        let terms: DealTerms = input::file::read_document(path)?;
        ScenarioComparisonInput {
            terms,
            scenarios: Vec::new(),
            preset_years: args.years,
            proceeds_policy: proceeds_policy(args.clamp),
        }
    } else if let Some(data) = input::from_stdin()? {
        data
    } else {
        return Err("--input <file>, --terms <file> or stdin required for compare".into());
    };
    let result = scenarios::analyze_scenarios(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_exit_curve(args: ExitCurveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let curve_input: ExitCurveInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(ref path) = args.terms {
        let terms: DealTerms = input::file::read_document(path)?;
        ExitCurveInput {
            terms,
            years_to_exit: args.years.ok_or("--years is required (or provide --input)")?,
            range: ExitRange {
                min: args.min,
                max: args.max.ok_or("--max is required (or provide --input)")?,
                step: args.step.ok_or("--step is required (or provide --input)")?,
            },
            proceeds_policy: proceeds_policy(args.clamp),
        }
    } else if let Some(data) = input::from_stdin()? {
        data
    } else {
        return Err("--input <file>, --terms <file> or stdin required for exit curve".into());
    };
    let result = scenarios::analyze_exit_curve(&curve_input)?;
    Ok(serde_json::to_value(result)?)
}
