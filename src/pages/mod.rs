//! ParaBank page objects
//!
//! [`LoginPage`] and [`DashboardPage`] wrap a [`Page`] with the site's
//! actions and queries, hiding locators and settle logic from scenarios.

pub mod constants;
pub mod dashboard;
pub mod locators;
pub mod login;

use std::path::PathBuf;

use crate::browser::Page;
use crate::common::config::{Config, CredentialsConfig};
use crate::common::wait::WaitOptions;
use crate::common::{join_url, paths, Result};

pub use dashboard::{DashboardPage, Section};
pub use login::LoginPage;

/// Everything a page object needs to know about the site under test
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub base_url: String,
    pub login_area_marker: String,
    pub credentials: CredentialsConfig,
    pub wait: WaitOptions,
    pub screenshot_dir: PathBuf,
}

impl SiteContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            login_area_marker: config.target.login_area_marker(),
            credentials: config.credentials.clone(),
            wait: WaitOptions::new(config.timeouts.wait(), config.timeouts.poll_interval()),
            screenshot_dir: config.screenshots.dir.clone(),
        }
    }

    /// Absolute URL of a page under the base URL
    pub fn url(&self, page: &str) -> String {
        join_url(&self.base_url, page)
    }
}

/// Capture the page and write it to `{screenshot_dir}/{name}.png`
pub(crate) async fn capture<P: Page + ?Sized>(
    page: &P,
    site: &SiteContext,
    name: &str,
) -> Result<PathBuf> {
    let bytes = page.screenshot().await?;

    paths::ensure_dir(&site.screenshot_dir)?;
    let path = site
        .screenshot_dir
        .join(format!("{}.png", paths::sanitize_file_stem(name)));
    tokio::fs::write(&path, &bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved screenshot");
    Ok(path)
}
