//! In-memory ParaBank simulation
//!
//! Models just enough of the site for the page objects: a URL, the login
//! state, the login error panel and the left-panel menu. Clicks that change
//! page can be held "in flight" for a number of queries to imitate slow
//! transitions, which exercises the condition waits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::common::{join_url, Error, Result};
use crate::pages::constants::{
    Credentials, BILL_PAY_PAGE, DEFAULT_BASE_URL, DEMO_CREDENTIALS, INDEX_PAGE, LOGIN_ERROR_TEXT,
    LOGIN_PAGE, LOGOUT_PAGE, OVERVIEW_PAGE, TRANSFER_PAGE,
};
use crate::pages::locators::*;

use super::{Locator, Page, PageProvider};

/// Minimal PNG signature returned as screenshot content
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Knobs for the simulated site
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Base URL pages are served under
    pub base_url: String,
    /// Queries answered with the old page before a click's navigation lands
    pub transition_polls: u32,
    /// Make every `goto` fail as if the network were down
    pub fail_navigation: bool,
    /// Clicks are accepted but never navigate anywhere
    pub frozen: bool,
    /// Opening a section silently drops the login
    pub session_expires_on_navigation: bool,
    /// The only username/password pair the site accepts
    pub accepted_username: String,
    pub accepted_password: String,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            transition_polls: 0,
            fail_navigation: false,
            frozen: false,
            session_expires_on_navigation: false,
            accepted_username: DEMO_CREDENTIALS.username.to_string(),
            accepted_password: DEMO_CREDENTIALS.password.to_string(),
        }
    }
}

/// A navigation that has been triggered but not yet rendered
#[derive(Debug, Clone)]
struct Transition {
    url: String,
    logged_in: bool,
    login_error: bool,
    remaining: u32,
}

#[derive(Debug)]
struct MockState {
    url: String,
    logged_in: bool,
    login_error: bool,
    pending: Option<Transition>,
    fields: HashMap<&'static str, String>,
    screenshots: usize,
    closed: bool,
    visited: Vec<String>,
}

impl MockState {
    fn new() -> Self {
        Self {
            url: "about:blank".to_string(),
            logged_in: false,
            login_error: false,
            pending: None,
            fields: HashMap::new(),
            screenshots: 0,
            closed: false,
            visited: Vec::new(),
        }
    }

    /// Advance an in-flight transition by one query
    fn tick(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        if pending.remaining > 0 {
            pending.remaining -= 1;
            return;
        }

        if let Some(t) = self.pending.take() {
            self.land(t.url, t.logged_in, t.login_error);
        }
    }

    fn land(&mut self, url: String, logged_in: bool, login_error: bool) {
        self.visited.push(url.clone());
        self.url = url;
        self.logged_in = logged_in;
        self.login_error = login_error;
        self.fields.clear();
    }

    fn page_name(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or("");
        path.rsplit('/').next().unwrap_or("")
    }

    fn on_site(&self) -> bool {
        self.url.starts_with("http")
    }

    fn is_visible(&self, locator: &Locator) -> bool {
        if !self.on_site() {
            return false;
        }

        let page = self.page_name();
        match *locator {
            LOGIN_FORM | USERNAME_INPUT | PASSWORD_INPUT | LOGIN_BUTTON => !self.logged_in,
            LOGIN_ERROR => !self.logged_in && self.login_error && page == LOGIN_PAGE,
            TRANSFER_LINK | BILL_PAY_LINK | OVERVIEW_LINK | LOGOUT_LINK => self.logged_in,
            ACCOUNTS_OVERVIEW => self.logged_in && page == OVERVIEW_PAGE,
            TRANSFER_FORM => self.logged_in && page == TRANSFER_PAGE,
            BILL_PAY_FORM => self.logged_in && page == BILL_PAY_PAGE,
            _ => false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::webdriver("invalid session id", "session deleted"))
        } else {
            Ok(())
        }
    }
}

/// Simulated browser tab
#[derive(Debug)]
pub struct MockPage {
    options: MockOptions,
    state: Mutex<MockState>,
}

impl MockPage {
    pub fn new(options: MockOptions) -> Self {
        Self {
            options,
            state: Mutex::new(MockState::new()),
        }
    }

    fn url(&self, page: &str) -> String {
        join_url(&self.options.base_url, page)
    }

    /// Number of screenshots taken so far
    pub async fn screenshot_count(&self) -> usize {
        self.state.lock().await.screenshots
    }

    /// Every URL the tab has landed on, in order
    pub async fn visited(&self) -> Vec<String> {
        self.state.lock().await.visited.clone()
    }

    fn accepts(&self, creds: Credentials<'_>) -> bool {
        creds.username == self.options.accepted_username
            && creds.password == self.options.accepted_password
    }

    /// Work out where a click leads, if anywhere
    fn click_target(&self, state: &MockState, locator: &Locator) -> Option<Transition> {
        let transition = |page: &str, logged_in: bool, login_error: bool| Transition {
            url: self.url(page),
            logged_in,
            login_error,
            remaining: self.options.transition_polls,
        };
        let section = |page: &str| {
            transition(page, !self.options.session_expires_on_navigation, false)
        };

        match *locator {
            LOGIN_BUTTON => {
                let creds = Credentials {
                    username: state.fields.get(USERNAME_INPUT.value).map_or("", |s| s.as_str()),
                    password: state.fields.get(PASSWORD_INPUT.value).map_or("", |s| s.as_str()),
                };
                if self.accepts(creds) {
                    Some(transition(OVERVIEW_PAGE, true, false))
                } else {
                    Some(transition(LOGIN_PAGE, false, true))
                }
            }
            TRANSFER_LINK => Some(section(TRANSFER_PAGE)),
            BILL_PAY_LINK => Some(section(BILL_PAY_PAGE)),
            OVERVIEW_LINK => Some(section(OVERVIEW_PAGE)),
            LOGOUT_LINK => Some(transition(INDEX_PAGE, false, false)),
            _ => None,
        }
    }
}

#[async_trait]
impl Page for MockPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        if self.options.fail_navigation {
            return Err(Error::navigation(url, "net::ERR_NAME_NOT_RESOLVED"));
        }

        state.pending = None;
        if url.ends_with(LOGOUT_PAGE) {
            state.land(self.url(INDEX_PAGE), false, false);
        } else {
            let logged_in = state.logged_in;
            state.land(url.to_string(), logged_in, false);
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.tick();
        Ok(state.url.clone())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.tick();
        Ok(state.is_visible(locator))
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        if !state.is_visible(locator) {
            return Err(Error::ElementNotFound(locator.to_string()));
        }

        if self.options.frozen {
            return Ok(());
        }

        if let Some(transition) = self.click_target(&state, locator) {
            if transition.remaining == 0 {
                state.land(transition.url, transition.logged_in, transition.login_error);
            } else {
                state.pending = Some(transition);
            }
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;

        if !state.is_visible(locator) {
            return Err(Error::ElementNotFound(locator.to_string()));
        }
        state.fields.insert(locator.value, text.to_string());
        Ok(())
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        let state = self.state.lock().await;
        state.ensure_open()?;

        if !state.is_visible(locator) {
            return Err(Error::ElementNotFound(locator.to_string()));
        }
        if *locator == LOGIN_ERROR {
            return Ok(LOGIN_ERROR_TEXT.to_string());
        }
        Ok(state.fields.get(locator.value).cloned().unwrap_or_default())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.screenshots += 1;

        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(state.url.as_bytes());
        Ok(png)
    }
}

/// Hands out fresh [`MockPage`]s and counts open/close calls
#[derive(Debug, Default)]
pub struct MockProvider {
    options: MockOptions,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl MockProvider {
    pub fn new(options: MockOptions) -> Self {
        Self {
            options,
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageProvider for MockProvider {
    type Page = MockPage;

    async fn open(&self) -> Result<MockPage> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockPage::new(self.options.clone()))
    }

    async fn close(&self, page: MockPage) -> Result<()> {
        page.state.lock().await.closed = true;
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(page: &str) -> String {
        join_url(DEFAULT_BASE_URL, page)
    }

    async fn submit(page: &MockPage, user: &str, pass: &str) {
        page.fill(&USERNAME_INPUT, user).await.unwrap();
        page.fill(&PASSWORD_INPUT, pass).await.unwrap();
        page.click(&LOGIN_BUTTON).await.unwrap();
    }

    #[tokio::test]
    async fn test_blank_page_shows_nothing() {
        let page = MockPage::new(MockOptions::default());
        assert!(!page.is_visible(&LOGIN_FORM).await.unwrap());
        assert_eq!(page.current_url().await.unwrap(), "about:blank");
    }

    #[tokio::test]
    async fn test_demo_login_lands_on_overview() {
        let page = MockPage::new(MockOptions::default());
        page.goto(&site(INDEX_PAGE)).await.unwrap();
        assert!(page.is_visible(&LOGIN_FORM).await.unwrap());

        submit(&page, "john", "demo").await;

        assert_eq!(page.current_url().await.unwrap(), site(OVERVIEW_PAGE));
        assert!(page.is_visible(&ACCOUNTS_OVERVIEW).await.unwrap());
        assert!(page.is_visible(&LOGOUT_LINK).await.unwrap());
        assert!(!page.is_visible(&LOGIN_FORM).await.unwrap());
    }

    #[tokio::test]
    async fn test_bad_login_shows_error() {
        let page = MockPage::new(MockOptions::default());
        page.goto(&site(INDEX_PAGE)).await.unwrap();
        submit(&page, "invalid_user", "wrong_password").await;

        assert_eq!(page.current_url().await.unwrap(), site(LOGIN_PAGE));
        assert!(page.is_visible(&LOGIN_ERROR).await.unwrap());
        assert_eq!(page.text(&LOGIN_ERROR).await.unwrap(), LOGIN_ERROR_TEXT);
    }

    #[tokio::test]
    async fn test_transition_is_delayed_by_polls() {
        let page = MockPage::new(MockOptions {
            transition_polls: 2,
            ..Default::default()
        });
        page.goto(&site(INDEX_PAGE)).await.unwrap();
        submit(&page, "john", "demo").await;

        // Two queries still see the old page, the third sees the new one
        assert!(!page.is_visible(&LOGOUT_LINK).await.unwrap());
        assert!(!page.is_visible(&LOGOUT_LINK).await.unwrap());
        assert!(page.is_visible(&LOGOUT_LINK).await.unwrap());
    }

    #[tokio::test]
    async fn test_click_hidden_element_fails() {
        let page = MockPage::new(MockOptions::default());
        page.goto(&site(INDEX_PAGE)).await.unwrap();
        let err = page.click(&LOGOUT_LINK).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_navigation() {
        let page = MockPage::new(MockOptions {
            fail_navigation: true,
            ..Default::default()
        });
        let err = page.goto(&site(INDEX_PAGE)).await.unwrap_err();
        assert!(matches!(err, Error::Navigation { .. }));
    }

    #[tokio::test]
    async fn test_provider_counts_sessions() {
        let provider = MockProvider::new(MockOptions::default());
        let page = provider.open().await.unwrap();
        provider.close(page).await.unwrap();
        assert_eq!(provider.opened(), 1);
        assert_eq!(provider.closed(), 1);
    }
}
