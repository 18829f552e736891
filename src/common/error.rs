//! Error types for the ParaBank suite
//!
//! Messages are meant to be read straight off the runner's failure line,
//! so they carry the URL, locator or condition involved.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the suite
#[derive(Error, Debug)]
pub enum Error {
    // === Assertion Errors ===
    #[error("Assertion failed: {0}")]
    Assertion(String),

    // === Page / Navigation Errors ===
    #[error("Navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out after {secs:.1} seconds waiting for {condition}")]
    WaitTimeout { condition: String, secs: f64 },

    // === WebDriver Errors ===
    #[error("WebDriver error '{code}': {message}")]
    WebDriver { code: String, message: String },

    #[error("WebDriver protocol error: {0}")]
    Protocol(String),

    #[error("Failed to create browser session: {0}")]
    SessionFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === Driver Process Errors ===
    #[error("WebDriver binary '{name}' not found. Searched: {searched}")]
    DriverNotFound { name: String, searched: String },

    #[error("WebDriver failed to start: {0}")]
    DriverStartFailed(String),

    #[error("WebDriver did not become ready within {0} seconds")]
    DriverStartTimeout(u64),

    // === Timeout Errors ===
    #[error("Operation timed out after {secs:.1} seconds")]
    Timeout { secs: f64 },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Suite Outcome ===
    #[error("{failed} of {total} scenarios failed")]
    SuiteFailed { failed: usize, total: usize },

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an assertion error
    pub fn assertion<S: Into<String>>(message: S) -> Self {
        Self::Assertion(message.into())
    }

    /// Create a navigation error
    pub fn navigation(url: &str, reason: impl ToString) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a driver not found error with search locations
    pub fn driver_not_found<S: AsRef<str>>(name: &str, paths: &[S]) -> Self {
        Self::DriverNotFound {
            name: name.to_string(),
            searched: paths.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
        }
    }

    /// Create a WebDriver error from a wire error code
    pub fn webdriver(code: &str, message: &str) -> Self {
        Self::WebDriver {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this error came from an assertion rather than the browser
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}
