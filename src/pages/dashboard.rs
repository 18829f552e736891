//! Dashboard (logged-in) page object

use std::path::PathBuf;

use crate::browser::{Locator, Page};
use crate::common::wait;
use crate::common::{Error, Result};

use super::constants::{BILL_PAY_PAGE, OVERVIEW_PAGE, TRANSFER_PAGE};
use super::locators::{
    ACCOUNTS_OVERVIEW, BILL_PAY_FORM, BILL_PAY_LINK, LOGOUT_LINK, OVERVIEW_LINK, TRANSFER_FORM,
    TRANSFER_LINK,
};
use super::{capture, SiteContext};

/// A section reachable from the account services menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    AccountsOverview,
    TransferFunds,
    BillPay,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::AccountsOverview => "accounts overview",
            Section::TransferFunds => "transfer funds",
            Section::BillPay => "bill pay",
        }
    }

    /// Page path the section lives at
    pub fn path(&self) -> &'static str {
        match self {
            Section::AccountsOverview => OVERVIEW_PAGE,
            Section::TransferFunds => TRANSFER_PAGE,
            Section::BillPay => BILL_PAY_PAGE,
        }
    }

    /// Menu link that opens the section
    pub fn link(&self) -> Locator {
        match self {
            Section::AccountsOverview => OVERVIEW_LINK,
            Section::TransferFunds => TRANSFER_LINK,
            Section::BillPay => BILL_PAY_LINK,
        }
    }

    /// Element that is present once the section has rendered
    pub fn landmark(&self) -> Locator {
        match self {
            Section::AccountsOverview => ACCOUNTS_OVERVIEW,
            Section::TransferFunds => TRANSFER_FORM,
            Section::BillPay => BILL_PAY_FORM,
        }
    }
}

/// Actions and queries available once logged in
pub struct DashboardPage<'a, P: Page + ?Sized> {
    page: &'a P,
    site: &'a SiteContext,
}

impl<'a, P: Page + ?Sized> DashboardPage<'a, P> {
    pub fn new(page: &'a P, site: &'a SiteContext) -> Self {
        Self { page, site }
    }

    /// Assert the accounts overview rendered after login
    pub async fn assert_dashboard_loaded(&self) -> Result<()> {
        let section = Section::AccountsOverview;
        if self.settled_on(section).await? {
            Ok(())
        } else {
            let url = self.page.current_url().await?;
            Err(Error::assertion(format!(
                "Expected dashboard ({}) to load, but page is at {}",
                section.name(),
                url
            )))
        }
    }

    /// Whether the account services menu (with its logout link) is showing
    pub async fn is_user_logged_in(&self) -> Result<bool> {
        self.page.is_visible(&LOGOUT_LINK).await
    }

    pub async fn go_to_transfer_funds(&self) -> Result<()> {
        self.go_to(Section::TransferFunds).await
    }

    pub async fn go_to_bill_pay(&self) -> Result<()> {
        self.go_to(Section::BillPay).await
    }

    pub async fn go_to_accounts_overview(&self) -> Result<()> {
        self.go_to(Section::AccountsOverview).await
    }

    /// Open a section from the menu and wait for it to render
    pub async fn go_to(&self, section: Section) -> Result<()> {
        tracing::debug!(section = section.name(), "Opening section");
        self.page.click(&section.link()).await?;

        let page = self.page;
        let landmark = section.landmark();
        wait::until(self.site.wait, section.name(), move || async move {
            let arrived = page.current_url().await?.contains(section.path())
                && page.is_visible(&landmark).await?;
            Ok::<_, Error>(arrived)
        })
        .await
    }

    pub async fn logout(&self) -> Result<()> {
        tracing::debug!("Logging out");
        self.page.click(&LOGOUT_LINK).await
    }

    pub async fn take_screenshot(&self, name: &str) -> Result<PathBuf> {
        capture(self.page, self.site, name).await
    }

    /// Poll until the section's URL and landmark are both present
    async fn settled_on(&self, section: Section) -> Result<bool> {
        let page = self.page;
        let landmark = section.landmark();
        wait::settle(self.site.wait, section.name(), move || async move {
            let arrived = page.is_visible(&landmark).await?
                && page.current_url().await?.contains(section.path());
            Ok::<_, Error>(arrived)
        })
        .await
    }
}
