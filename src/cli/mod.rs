//! CLI command handling
//!
//! Loads configuration, applies command-line overrides and hands the
//! selected scenarios to the runner.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::browser::WebDriverProvider;
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::driver;
use crate::pages::SiteContext;
use crate::suite::{run_suite, RunOptions, ScenarioId};

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub headed: bool,
    pub parallel: Option<usize>,
    pub base_url: Option<String>,
    pub driver_url: Option<String>,
    pub screenshots: Option<PathBuf>,
}

impl Overrides {
    /// Apply onto a loaded config and re-validate it
    pub fn apply(self, config: &mut Config) -> Result<()> {
        if self.headed {
            config.driver.headless = false;
        }
        if let Some(parallel) = self.parallel {
            config.runner.parallel = parallel;
        }
        if let Some(base_url) = self.base_url {
            config.target.base_url = base_url;
        }
        if let Some(driver_url) = self.driver_url {
            config.driver.url = Some(driver_url);
        }
        if let Some(dir) = self.screenshots {
            config.screenshots.dir = dir;
        }
        config.validate()
    }
}

/// Turn scenario names into ids; no names selects the whole suite
pub fn resolve_scenarios(names: &[String]) -> Result<Vec<ScenarioId>> {
    if names.is_empty() {
        return Ok(ScenarioId::ALL.to_vec());
    }

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let id: ScenarioId = name.parse()?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config_path: Option<&Path>, verbose: bool) -> Result<()> {
    match command {
        Commands::List => {
            for id in ScenarioId::ALL {
                println!("{:<20} {}", id.slug().white().bold(), id.title());
            }
            Ok(())
        }

        Commands::Check => {
            let config = load_config(config_path)?;
            check(&config).await
        }

        Commands::Run {
            scenarios,
            headed,
            parallel,
            base_url,
            driver_url,
            screenshots,
            report,
        } => {
            let ids = resolve_scenarios(&scenarios)?;

            let mut config = load_config(config_path)?;
            Overrides {
                headed,
                parallel,
                base_url,
                driver_url,
                screenshots,
            }
            .apply(&mut config)?;

            let site = SiteContext::from_config(&config);
            let options = RunOptions {
                parallel: config.runner.parallel,
                scenario_timeout: config.timeouts.scenario(),
                verbose,
            };

            let provider = WebDriverProvider::from_config(&config).await?;
            tracing::info!(driver = provider.driver_url(), "WebDriver ready");

            let summary = run_suite(&provider, &site, &ids, &options).await;

            if let Err(e) = provider.shutdown().await {
                tracing::warn!("Failed to stop WebDriver: {}", e);
            }

            if let Some(path) = report {
                summary.write_report(&path)?;
            }

            if summary.all_passed() {
                Ok(())
            } else {
                Err(Error::SuiteFailed {
                    failed: summary.failed,
                    total: summary.total(),
                })
            }
        }
    }
}

async fn check(config: &Config) -> Result<()> {
    let kind = config.driver.kind;

    if let Some(url) = &config.driver.url {
        let client = crate::webdriver::WebDriverClient::new(url)?;
        let timeout = std::time::Duration::from_secs(config.timeouts.driver_start_secs);
        driver::wait_ready(&client, timeout).await?;
        println!("{} {} is ready at {}", "✓".green(), kind.binary_name(), url);
        return Ok(());
    }

    let binary = driver::resolve_binary(&config.driver)?;
    println!("Found {} at {}", kind.binary_name(), binary.display());

    let process = driver::DriverProcess::spawn(
        &config.driver,
        std::time::Duration::from_secs(config.timeouts.driver_start_secs),
    )
    .await?;
    println!(
        "{} {} is ready at {}",
        "✓".green(),
        kind.binary_name(),
        process.url()
    );
    process.shutdown().await
}
