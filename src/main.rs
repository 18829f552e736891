//! ParaBank e2e - browser end-to-end suite for the ParaBank demo site
//!
//! Drives a real browser over WebDriver through the login, navigation and
//! logout flows, and exits non-zero when any scenario fails.

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use parabank::{cli, commands, common::logging};

#[derive(Parser)]
#[command(name = "parabank-e2e", about = "End-to-end login suite for ParaBank")]
#[command(version, long_about = None)]
struct Cli {
    /// Alternate configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging and per-scenario detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = logging::init_cli(cli.verbose);

    let result = cli::dispatch(cli.command, cli.config.as_deref(), cli.verbose).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
