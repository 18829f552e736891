//! Browser capability boundary
//!
//! Page objects only ever talk to a [`Page`]. The WebDriver-backed page
//! drives a real browser; [`mock::MockPage`] simulates ParaBank in memory
//! so scenario sequencing can be tested without one.

pub mod mock;
pub mod webdriver_page;

use async_trait::async_trait;
use std::fmt;

use crate::common::Result;

pub use mock::{MockOptions, MockPage, MockProvider};
pub use webdriver_page::{WebDriverPage, WebDriverProvider};

/// Element lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Using {
    Css,
    LinkText,
}

impl Using {
    /// W3C WebDriver strategy name
    pub fn as_webdriver(&self) -> &'static str {
        match self {
            Using::Css => "css selector",
            Using::LinkText => "link text",
        }
    }
}

/// A named way to find one element on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    pub using: Using,
    pub value: &'static str,
}

impl Locator {
    pub const fn css(value: &'static str) -> Self {
        Self {
            using: Using::Css,
            value,
        }
    }

    pub const fn link_text(value: &'static str) -> Self {
        Self {
            using: Using::LinkText,
            value,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.using.as_webdriver(), self.value)
    }
}

/// One browser tab, as seen by the page objects
#[async_trait]
pub trait Page: Send + Sync {
    /// Load a URL and wait for the document to finish loading
    async fn goto(&self, url: &str) -> Result<()>;

    /// URL of the current document
    async fn current_url(&self) -> Result<String>;

    /// Whether the element exists and is displayed; absent means `false`
    async fn is_visible(&self, locator: &Locator) -> Result<bool>;

    /// Click an element; fails with `ElementNotFound` when absent
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replace the contents of an input element
    async fn fill(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Rendered text of an element
    async fn text(&self, locator: &Locator) -> Result<String>;

    /// PNG capture of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>>;
}

/// Hands out a fresh, isolated page per scenario
#[async_trait]
pub trait PageProvider: Send + Sync {
    type Page: Page;

    /// Provision a new page with its own browser session
    async fn open(&self) -> Result<Self::Page>;

    /// Tear the page's session down
    async fn close(&self, page: Self::Page) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display() {
        let loc = Locator::css("input[name='username']");
        assert_eq!(loc.to_string(), "css selector 'input[name='username']'");
        assert_eq!(Locator::link_text("Log Out").using.as_webdriver(), "link text");
    }
}
