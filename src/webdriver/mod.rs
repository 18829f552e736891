//! W3C WebDriver client
//!
//! Talks to a chromedriver or geckodriver server over HTTP. Only the
//! commands the ParaBank page objects need are implemented.

pub mod client;
pub mod protocol;
pub mod types;

pub use client::{Session, WebDriverClient};
