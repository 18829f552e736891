//! [`Page`] backed by a real browser over WebDriver

use async_trait::async_trait;
use serde_json::Value;

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::driver::DriverProcess;
use crate::webdriver::protocol::STALE_ELEMENT;
use crate::webdriver::types::{browser_capabilities, TimeoutsRequest};
use crate::webdriver::{Session, WebDriverClient};

use super::{Locator, Page, PageProvider};

/// One browser session seen as a page
#[derive(Debug)]
pub struct WebDriverPage {
    session: Session,
}

#[async_trait]
impl Page for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.session.navigate(url).await.map_err(|e| match e {
            Error::WebDriver { .. } | Error::Http(_) => {
                Error::navigation(url, e)
            }
            other => other,
        })
    }

    async fn current_url(&self) -> Result<String> {
        self.session.current_url().await
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let Some(elem) = self.session.find_element(locator).await? else {
            return Ok(false);
        };

        // The page may re-render between lookup and query
        match self.session.element_displayed(&elem).await {
            Ok(displayed) => Ok(displayed),
            Err(Error::WebDriver { code, .. }) if code == STALE_ELEMENT => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let elem = self.session.require_element(locator).await?;
        self.session.element_click(&elem).await
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        let elem = self.session.require_element(locator).await?;
        self.session.element_clear(&elem).await?;
        self.session.element_send_keys(&elem, text).await
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        let elem = self.session.require_element(locator).await?;
        self.session.element_text(&elem).await
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.session.screenshot().await
    }
}

/// Opens one WebDriver session per page
#[derive(Debug)]
pub struct WebDriverProvider {
    client: WebDriverClient,
    capabilities: Value,
    page_load_ms: u64,
    /// Locally spawned driver, if we started one
    driver: Option<DriverProcess>,
}

impl WebDriverProvider {
    /// Connect to the configured driver URL, or spawn a local driver
    pub async fn from_config(config: &Config) -> Result<Self> {
        let (client, driver) = match &config.driver.url {
            Some(url) => {
                tracing::info!(url = %url, "Using external WebDriver server");
                (WebDriverClient::new(url)?, None)
            }
            None => {
                let process = DriverProcess::spawn(
                    &config.driver,
                    std::time::Duration::from_secs(config.timeouts.driver_start_secs),
                )
                .await?;
                (WebDriverClient::new(process.url())?, Some(process))
            }
        };

        Ok(Self {
            client,
            capabilities: browser_capabilities(
                config.driver.kind,
                config.driver.headless,
                &config.driver.browser_args,
            ),
            page_load_ms: config.timeouts.navigation_secs.saturating_mul(1000),
            driver,
        })
    }

    pub fn driver_url(&self) -> &str {
        self.client.base_url()
    }

    /// Stop the local driver if we own one
    pub async fn shutdown(self) -> Result<()> {
        match self.driver {
            Some(driver) => driver.shutdown().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PageProvider for WebDriverProvider {
    type Page = WebDriverPage;

    async fn open(&self) -> Result<WebDriverPage> {
        let session = self.client.new_session(self.capabilities.clone()).await?;
        let timeouts = TimeoutsRequest {
            page_load: Some(self.page_load_ms),
            implicit: Some(0),
        };

        if let Err(e) = session.set_timeouts(timeouts).await {
            let _ = session.delete().await;
            return Err(e);
        }
        Ok(WebDriverPage { session })
    }

    async fn close(&self, page: WebDriverPage) -> Result<()> {
        page.session.delete().await
    }
}
