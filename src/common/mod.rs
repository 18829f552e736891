//! Common utilities shared by the runner, page objects and WebDriver client

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod wait;

pub use error::{Error, Result};

/// Join a base URL and a page path with exactly one slash between them
pub fn join_url(base: &str, page: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        page.trim_start_matches('/')
    )
}
