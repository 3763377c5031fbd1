use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use termsheet_core::distribution::{self, DistributionInput, ProceedsPolicy};
use termsheet_core::terms::DealTerms;

use crate::input;

/// Arguments for a single exit distribution
#[derive(Args)]
pub struct DistributeArgs {
    /// Path to a JSON/YAML DistributionInput (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML DealTerms document
    #[arg(long)]
    pub terms: Option<String>,

    /// Exit valuation
    #[arg(long)]
    pub exit: Option<Decimal>,

    /// Years from investment to exit
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Limit investor proceeds to the exit valuation
    #[arg(long)]
    pub clamp: bool,
}

pub fn proceeds_policy(clamp: bool) -> ProceedsPolicy {
    if clamp {
        ProceedsPolicy::ClampToExit
    } else {
        ProceedsPolicy::Unclamped
    }
}

pub fn run_distribute(args: DistributeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dist_input: DistributionInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(ref path) = args.terms {
        let terms: DealTerms = input::file::read_document(path)?;
        DistributionInput {
            terms,
            exit_valuation: args.exit.ok_or("--exit is required (or provide --input)")?,
            years_to_exit: args.years.ok_or("--years is required (or provide --input)")?,
            proceeds_policy: proceeds_policy(args.clamp),
        }
    } else if let Some(data) = input::from_stdin()? {
        data
    } else {
        return Err("--input <file>, --terms <file> or stdin required for distribute".into());
    };
    let result = distribution::analyze_distribution(&dist_input)?;
    Ok(serde_json::to_value(result)?)
}
