use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use termsheet_core::cost_of_capital::{self, CostOfCapitalInput};
use termsheet_core::terms::DealTerms;

use crate::input;

/// Arguments for the preference cost-of-capital model
#[derive(Args)]
pub struct CostOfCapitalArgs {
    /// Path to a JSON/YAML CostOfCapitalInput (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON/YAML DealTerms document
    #[arg(long)]
    pub terms: Option<String>,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<Decimal>,
}

pub fn run_cost_of_capital(args: CostOfCapitalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let coc_input: CostOfCapitalInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(ref path) = args.terms {
        let terms: DealTerms = input::file::read_document(path)?;
        CostOfCapitalInput {
            terms,
            years_to_exit: args.years.ok_or("--years is required (or provide --input)")?,
        }
    } else if let Some(data) = input::from_stdin()? {
        data
    } else {
        return Err(
            "--input <file>, --terms <file> or stdin required for cost of capital".into(),
        );
    };
    let result = cost_of_capital::analyze_cost_of_capital(&coc_input)?;
    Ok(serde_json::to_value(result)?)
}
