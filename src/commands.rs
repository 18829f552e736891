//! CLI command definitions
//!
//! Defines the clap commands for the ParaBank e2e runner.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios (all of them when none are named)
    Run {
        /// Scenario slugs or full titles, e.g. valid-login logout
        scenarios: Vec<String>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,

        /// Number of scenarios to run at once
        #[arg(long, short = 'j')]
        parallel: Option<usize>,

        /// Override the site base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Use an already running WebDriver server instead of spawning one
        #[arg(long)]
        driver_url: Option<String>,

        /// Directory to write screenshots into
        #[arg(long)]
        screenshots: Option<PathBuf>,

        /// Write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the registered scenarios
    #[command(alias = "ls")]
    List,

    /// Start the configured driver and report whether it is ready
    Check,
}
