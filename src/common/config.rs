//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::{config_path, DEFAULT_SCREENSHOT_DIR};
use super::Result;
use crate::pages::constants::{Credentials, DEFAULT_BASE_URL, DEMO_CREDENTIALS};

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Site under test
    #[serde(default)]
    pub target: TargetConfig,

    /// Credentials used by `quick_login`
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// WebDriver settings
    #[serde(default)]
    pub driver: DriverConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Screenshot output settings
    #[serde(default)]
    pub screenshots: ScreenshotConfig,

    /// Runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Target site settings
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    /// Base URL of the ParaBank deployment, without a trailing page
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Substring of the URL that identifies the login area; follows
    /// `base_url` when unset
    #[serde(default)]
    pub login_area_marker: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_area_marker: None,
        }
    }
}

impl TargetConfig {
    /// Explicit marker, or host and path of the base URL
    pub fn login_area_marker(&self) -> String {
        match &self.login_area_marker {
            Some(marker) => marker.clone(),
            None => marker_for(&self.base_url),
        }
    }
}

/// Strip the scheme and trailing slash from a base URL
fn marker_for(base_url: &str) -> String {
    let rest = base_url
        .split_once("://")
        .map_or(base_url, |(_, rest)| rest);
    rest.trim_end_matches('/').to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Demo credential override
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

fn default_username() -> String {
    DEMO_CREDENTIALS.username.to_string()
}

fn default_password() -> String {
    DEMO_CREDENTIALS.password.to_string()
}

impl CredentialsConfig {
    /// Borrow as a credential pair
    pub fn as_credentials(&self) -> Credentials<'_> {
        Credentials {
            username: &self.username,
            password: &self.password,
        }
    }
}

/// Which WebDriver implementation to talk to
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// chromedriver (Chrome / Chromium)
    #[default]
    Chromedriver,
    /// geckodriver (Firefox)
    Geckodriver,
}

impl DriverKind {
    /// Executable name looked up on PATH
    pub fn binary_name(&self) -> &'static str {
        match self {
            DriverKind::Chromedriver => "chromedriver",
            DriverKind::Geckodriver => "geckodriver",
        }
    }

    /// Port the driver listens on by default
    pub fn default_port(&self) -> u16 {
        match self {
            DriverKind::Chromedriver => 9515,
            DriverKind::Geckodriver => 4444,
        }
    }
}

/// WebDriver settings
#[derive(Debug, Deserialize, Clone)]
pub struct DriverConfig {
    /// Driver implementation
    #[serde(default)]
    pub kind: DriverKind,

    /// Explicit path to the driver binary (otherwise searched on PATH)
    pub path: Option<PathBuf>,

    /// URL of an already running driver; skips spawning one
    pub url: Option<String>,

    /// Port for a spawned driver (defaults per kind)
    pub port: Option<u16>,

    /// Run the browser without a window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Extra browser arguments
    #[serde(default)]
    pub browser_args: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            kind: DriverKind::default(),
            path: None,
            url: None,
            port: None,
            headless: true,
            browser_args: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl DriverConfig {
    /// Port to bind a spawned driver on
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.kind.default_port())
    }
}

/// Timeout settings
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Page load timeout applied to each session
    #[serde(default = "default_navigation")]
    pub navigation_secs: u64,

    /// Upper bound for condition waits (element visible, URL changed)
    #[serde(default = "default_wait")]
    pub wait_secs: u64,

    /// Polling interval for condition waits
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Upper bound for one whole scenario
    #[serde(default = "default_scenario")]
    pub scenario_secs: u64,

    /// Time allowed for a spawned driver to report ready
    #[serde(default = "default_driver_start")]
    pub driver_start_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_secs: default_navigation(),
            wait_secs: default_wait(),
            poll_interval_ms: default_poll_interval(),
            scenario_secs: default_scenario(),
            driver_start_secs: default_driver_start(),
        }
    }
}

fn default_navigation() -> u64 {
    30
}
fn default_wait() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    100
}
fn default_scenario() -> u64 {
    120
}
fn default_driver_start() -> u64 {
    10
}

/// Largest accepted value for any `*_secs` timeout (one day)
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

impl Timeouts {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("navigation_secs", self.navigation_secs),
            ("wait_secs", self.wait_secs),
            ("scenario_secs", self.scenario_secs),
            ("driver_start_secs", self.driver_start_secs),
        ];
        for (name, secs) in fields {
            if secs > MAX_TIMEOUT_SECS {
                return Err(super::Error::Config(format!(
                    "timeouts.{} must be at most {}, got {}",
                    name, MAX_TIMEOUT_SECS, secs
                )));
            }
        }
        if self.poll_interval_ms > MAX_TIMEOUT_SECS * 1000 {
            return Err(super::Error::Config(format!(
                "timeouts.poll_interval_ms must be at most {}, got {}",
                MAX_TIMEOUT_SECS * 1000,
                self.poll_interval_ms
            )));
        }
        Ok(())
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn scenario(&self) -> Duration {
        Duration::from_secs(self.scenario_secs)
    }
}

/// Screenshot output settings
#[derive(Debug, Deserialize, Clone)]
pub struct ScreenshotConfig {
    #[serde(default = "default_screenshot_dir")]
    pub dir: PathBuf,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            dir: default_screenshot_dir(),
        }
    }
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SCREENSHOT_DIR)
}

/// Runner settings
#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    /// Maximum scenarios in flight, each on its own session
    #[serde(default = "default_parallel")]
    pub parallel: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

fn default_parallel() -> usize {
    1
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde defaults cannot guard
    pub fn validate(&self) -> Result<()> {
        if self.runner.parallel == 0 {
            return Err(super::Error::Config(
                "runner.parallel must be at least 1".to_string(),
            ));
        }
        if !self.target.base_url.starts_with("http://")
            && !self.target.base_url.starts_with("https://")
        {
            return Err(super::Error::Config(format!(
                "target.base_url must be an http(s) URL, got '{}'",
                self.target.base_url
            )));
        }
        self.timeouts.validate()
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.target.base_url.trim_end_matches('/')
    }
}
