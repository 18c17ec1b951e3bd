//! # payflow CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use payflow_cli::parse::{run_parse, ParseArgs};
use payflow_cli::recurring::{run_recurring, RecurringArgs};
use payflow_cli::sale::{run_sale, SaleArgs};

/// Payflow NVP gateway client
///
/// Builds, dry-runs and submits single and recurring payment transactions,
/// and decodes raw gateway responses.
#[derive(Parser, Debug)]
#[command(name = "payflow", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a single transaction (sale, authorization, credit, ...).
    Sale(SaleArgs),

    /// Add or modify a recurring billing profile.
    Recurring(RecurringArgs),

    /// Decode a raw gateway response from a file or stdin.
    Parse(ParseArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("payflow CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Sale(args) => run_sale(&args).await,
        Commands::Recurring(args) => run_recurring(&args).await,
        Commands::Parse(args) => run_parse(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
