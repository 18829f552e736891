//! ParaBank e2e - browser end-to-end suite for the ParaBank demo site
//!
//! Page objects over a [`browser::Page`] capability, a minimal W3C
//! WebDriver client behind it, and a runner that gives every scenario its
//! own browser session.

pub mod browser;
pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod pages;
pub mod suite;
pub mod webdriver;

// Re-export commonly used types for tests
pub use browser::{MockOptions, MockPage, MockProvider, Page, PageProvider};
pub use common::{Error, Result};
pub use pages::{DashboardPage, LoginPage, SiteContext};
pub use suite::{run_suite, RunOptions, ScenarioId, SuiteSummary};
