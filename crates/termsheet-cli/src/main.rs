mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;

use commands::cost_of_capital::CostOfCapitalArgs;
use commands::scenarios::{CompareArgs, ExitCurveArgs};
use commands::waterfall::DistributeArgs;

/// Venture financing waterfall and cost-of-capital analysis
#[derive(Parser)]
#[command(
    name = "tsm",
    version,
    about = "Venture financing waterfall and cost-of-capital analysis",
    long_about = "Split exit proceeds between investors and founders under a round's \
                  liquidation preference, price the preference as a cost of capital, \
                  and compare exit scenarios. Terms are read from JSON or YAML."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity on stderr (warn by default, -v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Split exit proceeds between investor and founders
    Distribute(DistributeArgs),
    /// Effective APR, break-even exit and dilution cost of the preference
    CostOfCapital(CostOfCapitalArgs),
    /// Compare a set of exit scenarios side by side
    Compare(CompareArgs),
    /// Payout curve across a range of exit valuations
    ExitCurve(ExitCurveArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Distribute(args) => commands::waterfall::run_distribute(args),
        Commands::CostOfCapital(args) => commands::cost_of_capital::run_cost_of_capital(args),
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::ExitCurve(args) => commands::scenarios::run_exit_curve(args),
        Commands::Version => {
            println!("tsm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
