//! Login page object

use std::path::PathBuf;

use crate::browser::Page;
use crate::common::wait;
use crate::common::{Error, Result};

use super::constants::INDEX_PAGE;
use super::locators::{
    LOGIN_BUTTON, LOGIN_ERROR, LOGIN_FORM, LOGOUT_LINK, PASSWORD_INPUT, USERNAME_INPUT,
};
use super::{capture, SiteContext};

/// Actions and queries on the ParaBank login form
pub struct LoginPage<'a, P: Page + ?Sized> {
    page: &'a P,
    site: &'a SiteContext,
}

impl<'a, P: Page + ?Sized> LoginPage<'a, P> {
    pub fn new(page: &'a P, site: &'a SiteContext) -> Self {
        Self { page, site }
    }

    /// Open the ParaBank home page and wait for its login form
    pub async fn navigate_to_login(&self) -> Result<()> {
        let url = self.site.url(INDEX_PAGE);
        tracing::debug!(url = %url, "Navigating to login");
        self.page.goto(&url).await?;
        self.wait_for_login_form().await
    }

    /// Navigate to login and sign in with the configured demo credentials
    pub async fn quick_login(&self) -> Result<()> {
        self.navigate_to_login().await?;
        let creds = self.site.credentials.as_credentials();
        self.login(creds.username, creds.password).await
    }

    /// Fill the form and submit it
    ///
    /// Returns once the submit click is delivered; it does not wait for
    /// the outcome.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        tracing::debug!(username, "Submitting login form");
        self.page.fill(&USERNAME_INPUT, username).await?;
        self.page.fill(&PASSWORD_INPUT, password).await?;
        self.page.click(&LOGIN_BUTTON).await
    }

    pub async fn assert_login_form_visible(&self) -> Result<()> {
        if self.page.is_visible(&LOGIN_FORM).await? {
            Ok(())
        } else {
            let url = self.page.current_url().await?;
            Err(Error::assertion(format!(
                "Expected login form to be visible at {}",
                url
            )))
        }
    }

    /// Wait until the login form is rendered
    pub async fn wait_for_login_form(&self) -> Result<()> {
        let page = self.page;
        wait::until(self.site.wait, "login form", move || page.is_visible(&LOGIN_FORM)).await
    }

    /// Wait for a submitted login to resolve either way
    ///
    /// Returns `false` if neither the error panel nor the logged-in menu
    /// showed up in time.
    pub async fn wait_for_login_outcome(&self) -> Result<bool> {
        let page = self.page;
        wait::settle(self.site.wait, "login outcome", move || async move {
            let resolved =
                page.is_visible(&LOGIN_ERROR).await? || page.is_visible(&LOGOUT_LINK).await?;
            Ok::<_, Error>(resolved)
        })
        .await
    }

    pub async fn get_current_url(&self) -> Result<String> {
        self.page.current_url().await
    }

    /// Text of the login error panel, if shown
    pub async fn error_message(&self) -> Result<Option<String>> {
        if self.page.is_visible(&LOGIN_ERROR).await? {
            Ok(Some(self.page.text(&LOGIN_ERROR).await?))
        } else {
            Ok(None)
        }
    }

    pub async fn take_screenshot(&self, name: &str) -> Result<PathBuf> {
        capture(self.page, self.site, name).await
    }
}
