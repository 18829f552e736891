//! Suite runner
//!
//! Gives every scenario its own page from a [`PageProvider`], bounds it
//! with a timeout and always closes the page afterwards, pass or fail.

use std::path::Path;
use std::time::{Duration, Instant};

use colored::Colorize;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use crate::browser::PageProvider;
use crate::common::{Error, Result};
use crate::pages::SiteContext;

use super::scenarios::{self, ScenarioContext, ScenarioId};

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub title: String,
    pub passed: bool,
    pub steps_run: usize,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Outcome of a whole run, in suite order
#[derive(Debug, Serialize)]
pub struct SuiteSummary {
    pub results: Vec<ScenarioResult>,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl SuiteSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Write the summary as pretty JSON
    pub fn write_report(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Wrote run report");
        Ok(())
    }
}

/// Runner settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Scenarios in flight at once
    pub parallel: usize,
    /// Upper bound for each scenario
    pub scenario_timeout: Duration,
    /// Print the title under passing scenarios too
    pub verbose: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel: 1,
            scenario_timeout: Duration::from_secs(120),
            verbose: false,
        }
    }
}

/// Run one scenario on a fresh page
pub async fn run_scenario<P: PageProvider>(
    provider: &P,
    site: &SiteContext,
    id: ScenarioId,
    timeout: Duration,
) -> ScenarioResult {
    let started = Instant::now();
    tracing::info!(scenario = %id, "Starting scenario");

    let page = match provider.open().await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(scenario = %id, "Could not open page: {}", e);
            return result_for(id, started, 0, Err(e));
        }
    };

    let mut ctx = ScenarioContext::new(&page, site);
    let outcome = match tokio::time::timeout(timeout, scenarios::run(id, &mut ctx)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(Error::Timeout {
            secs: timeout.as_secs_f64(),
        }),
    };
    let steps_run = ctx.steps().len();

    if let Err(e) = provider.close(page).await {
        tracing::warn!(scenario = %id, "Failed to close page: {}", e);
    }

    result_for(id, started, steps_run, outcome)
}

fn result_for(
    id: ScenarioId,
    started: Instant,
    steps_run: usize,
    outcome: Result<()>,
) -> ScenarioResult {
    let duration_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(()) => {
            tracing::info!(scenario = %id, duration_ms, "Scenario passed");
            ScenarioResult {
                name: id.slug().to_string(),
                title: id.title().to_string(),
                passed: true,
                steps_run,
                error: None,
                duration_ms,
            }
        }
        Err(e) => {
            tracing::info!(scenario = %id, duration_ms, "Scenario failed: {}", e);
            ScenarioResult {
                name: id.slug().to_string(),
                title: id.title().to_string(),
                passed: false,
                steps_run,
                error: Some(e.to_string()),
                duration_ms,
            }
        }
    }
}

/// Run the given scenarios, at most `options.parallel` at a time
///
/// A failing scenario never stops the others. Results come back in the
/// order of `ids`, regardless of completion order.
pub async fn run_suite<P: PageProvider>(
    provider: &P,
    site: &SiteContext,
    ids: &[ScenarioId],
    options: &RunOptions,
) -> SuiteSummary {
    let started = Instant::now();

    println!(
        "\n{} {} scenario(s) against {}",
        "Running".blue().bold(),
        ids.len(),
        site.base_url.white().bold()
    );

    let mut indexed: Vec<(usize, ScenarioResult)> = stream::iter(ids.iter().copied().enumerate())
        .map(|(index, id)| async move {
            let result = run_scenario(provider, site, id, options.scenario_timeout).await;
            print_result(&result, options.verbose);
            (index, result)
        })
        .buffer_unordered(options.parallel.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<ScenarioResult> = indexed.into_iter().map(|(_, r)| r).collect();

    let passed = results.iter().filter(|r| r.passed).count();
    let summary = SuiteSummary {
        failed: results.len() - passed,
        passed,
        results,
        duration_ms: started.elapsed().as_millis() as u64,
    };

    print_summary(&summary);
    summary
}

fn print_result(result: &ScenarioResult, verbose: bool) {
    let secs = result.duration_ms as f64 / 1000.0;

    if result.passed {
        println!(
            "  {} {} {}",
            "✓".green(),
            result.name.white(),
            format!("({:.1}s)", secs).dimmed()
        );
        if verbose {
            println!("      {}", result.title.dimmed());
        }
    } else {
        println!(
            "  {} {} {}",
            "✗".red(),
            result.name.white().bold(),
            format!("({:.1}s)", secs).dimmed()
        );
        println!("      {}", result.title.dimmed());
        if let Some(error) = &result.error {
            println!(
                "      Step {}: {}",
                result.steps_run + 1,
                error.red()
            );
        }
    }
}

fn print_summary(summary: &SuiteSummary) {
    let secs = summary.duration_ms as f64 / 1000.0;

    if summary.all_passed() {
        println!(
            "\n{} {} passed {}\n",
            "✓".green().bold(),
            summary.passed.to_string().green().bold(),
            format!("({:.1}s)", secs).dimmed()
        );
    } else {
        println!(
            "\n{} {} passed, {} failed {}\n",
            "✗".red().bold(),
            summary.passed,
            summary.failed.to_string().red().bold(),
            format!("({:.1}s)", secs).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{MockOptions, MockProvider};
    use crate::common::wait::WaitOptions;
    use crate::pages::constants::DEFAULT_BASE_URL;

    fn site(dir: &Path) -> SiteContext {
        SiteContext {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_area_marker: "parabank.parasoft.com/parabank".to_string(),
            credentials: Default::default(),
            wait: WaitOptions::new(Duration::from_millis(50), Duration::from_millis(1)),
            screenshot_dir: dir.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_suite_passes_and_closes_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new(MockOptions::default());

        let summary = run_suite(
            &provider,
            &site(dir.path()),
            &ScenarioId::ALL,
            &RunOptions::default(),
        )
        .await;

        assert!(summary.all_passed(), "{:?}", summary.results);
        assert_eq!(summary.total(), 5);
        assert_eq!(provider.opened(), 5);
        assert_eq!(provider.closed(), 5);
    }

    #[tokio::test]
    async fn test_failures_are_isolated_and_pages_still_closed() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new(MockOptions {
            frozen: true,
            ..Default::default()
        });

        let summary = run_suite(
            &provider,
            &site(dir.path()),
            &ScenarioId::ALL,
            &RunOptions {
                parallel: 3,
                ..Default::default()
            },
        )
        .await;

        // Only the URL-based invalid-login check survives a page that never navigates
        let passed: Vec<&str> = summary
            .results
            .iter()
            .filter(|r| r.passed)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(passed, vec!["invalid-login"]);
        assert_eq!(summary.failed, 4);
        assert_eq!(provider.closed(), 5);
    }

    #[tokio::test]
    async fn test_results_keep_requested_order() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new(MockOptions::default());
        let ids = [ScenarioId::Screenshots, ScenarioId::ValidLogin, ScenarioId::Logout];

        let summary = run_suite(
            &provider,
            &site(dir.path()),
            &ids,
            &RunOptions {
                parallel: 3,
                ..Default::default()
            },
        )
        .await;

        let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["screenshots", "valid-login", "logout"]);
    }

    #[tokio::test]
    async fn test_scenario_timeout_fails_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new(MockOptions {
            frozen: true,
            ..Default::default()
        });
        let mut slow_site = site(dir.path());
        slow_site.wait = WaitOptions::new(Duration::from_secs(30), Duration::from_millis(5));

        let result = run_scenario(
            &provider,
            &slow_site,
            ScenarioId::Logout,
            Duration::from_millis(100),
        )
        .await;

        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("Operation timed out after 0.1 seconds")
        );
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn test_open_failure_is_reported() {
        struct Unreachable;

        #[async_trait::async_trait]
        impl PageProvider for Unreachable {
            type Page = crate::browser::MockPage;

            async fn open(&self) -> Result<Self::Page> {
                Err(Error::SessionFailed("chrome not reachable".to_string()))
            }

            async fn close(&self, _page: Self::Page) -> Result<()> {
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let result = run_scenario(
            &Unreachable,
            &site(dir.path()),
            ScenarioId::ValidLogin,
            Duration::from_secs(5),
        )
        .await;

        assert!(!result.passed);
        assert_eq!(result.steps_run, 0);
        assert!(result.error.unwrap().contains("chrome not reachable"));
    }

    #[test]
    fn test_report_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let summary = SuiteSummary {
            results: vec![ScenarioResult {
                name: "logout".to_string(),
                title: "should logout successfully".to_string(),
                passed: true,
                steps_run: 5,
                error: None,
                duration_ms: 12,
            }],
            passed: 1,
            failed: 0,
            duration_ms: 12,
        };

        summary.write_report(&path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["results"][0]["name"], "logout");
    }
}
