//! WebDriver client for communicating with chromedriver / geckodriver
//!
//! Commands are plain HTTP requests with JSON bodies. The client is cheap
//! to clone; each [`Session`] owns one browser instance.

use std::time::Duration;

use base64::Engine;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::browser::Locator;
use crate::common::{join_url, Error, Result};

use super::protocol::{self, NO_SUCH_ELEMENT};
use super::types::*;

/// Timeout for establishing the TCP connection to the driver
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Connection to a WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: String,
}

impl WebDriverClient {
    /// Create a client for the driver at `base_url` (e.g. `http://127.0.0.1:9515`)
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a command and decode its `value`
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = join_url(&self.base_url, path);
        tracing::debug!("WebDriver >>> {} {}", method, path);

        let mut request = self.http.request(method.clone(), &url);
        if method == Method::POST {
            // POST commands require a JSON body even when they take no parameters
            request = request.json(&body.unwrap_or_else(|| json!({})));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::trace!("WebDriver <<< {} {}", status, text);

        protocol::decode(status, &text, path)
    }

    /// Query whether the driver can create new sessions
    pub async fn status(&self) -> Result<StatusResponse> {
        self.execute(Method::GET, "status", None).await
    }

    /// Start a new browser session
    pub async fn new_session(&self, capabilities: Value) -> Result<Session> {
        let request = NewSessionRequest {
            capabilities: CapabilitiesRequest {
                always_match: capabilities,
            },
        };

        let response: NewSessionResponse = self
            .execute(Method::POST, "session", Some(serde_json::to_value(&request)?))
            .await
            .map_err(|e| match e {
                Error::SessionFailed(_) => e,
                other => Error::SessionFailed(other.to_string()),
            })?;

        let caps = &response.capabilities;
        tracing::info!(
            session = %response.session_id,
            browser = caps["browserName"].as_str().unwrap_or("unknown"),
            version = caps["browserVersion"].as_str().unwrap_or("unknown"),
            "Browser session created"
        );

        Ok(Session {
            client: self.clone(),
            id: response.session_id,
        })
    }
}

/// One WebDriver session (one browser)
#[derive(Debug)]
pub struct Session {
    client: WebDriverClient,
    id: String,
}

impl Session {
    async fn command<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let path = format!("session/{}/{}", self.id, path);
        self.client.execute(method, &path, body).await
    }

    /// Set page load and implicit wait timeouts
    pub async fn set_timeouts(&self, timeouts: TimeoutsRequest) -> Result<()> {
        self.command(Method::POST, "timeouts", Some(serde_json::to_value(&timeouts)?))
            .await
    }

    /// Navigate to a URL; returns once the document has loaded
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let body = UrlRequest {
            url: url.to_string(),
        };
        self.command(Method::POST, "url", Some(serde_json::to_value(&body)?))
            .await
    }

    pub async fn current_url(&self) -> Result<String> {
        self.command(Method::GET, "url", None).await
    }

    /// Find the first element matching `locator`, or `None` if there is none
    pub async fn find_element(&self, locator: &Locator) -> Result<Option<ElementRef>> {
        let body = FindElementRequest {
            using: locator.using.as_webdriver().to_string(),
            value: locator.value.to_string(),
        };

        match self
            .command::<ElementRef>(Method::POST, "element", Some(serde_json::to_value(&body)?))
            .await
        {
            Ok(elem) => Ok(Some(elem)),
            Err(Error::ElementNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Find an element or fail with `ElementNotFound` naming the locator
    pub async fn require_element(&self, locator: &Locator) -> Result<ElementRef> {
        self.find_element(locator)
            .await?
            .ok_or_else(|| Error::ElementNotFound(format!("{} ({})", locator, NO_SUCH_ELEMENT)))
    }

    pub async fn element_displayed(&self, elem: &ElementRef) -> Result<bool> {
        self.command(
            Method::GET,
            &format!("element/{}/displayed", elem.id),
            None,
        )
        .await
    }

    pub async fn element_click(&self, elem: &ElementRef) -> Result<()> {
        self.command(Method::POST, &format!("element/{}/click", elem.id), None)
            .await
    }

    pub async fn element_clear(&self, elem: &ElementRef) -> Result<()> {
        self.command(Method::POST, &format!("element/{}/clear", elem.id), None)
            .await
    }

    pub async fn element_send_keys(&self, elem: &ElementRef, text: &str) -> Result<()> {
        let body = SendKeysRequest {
            text: text.to_string(),
        };
        self.command(
            Method::POST,
            &format!("element/{}/value", elem.id),
            Some(serde_json::to_value(&body)?),
        )
        .await
    }

    pub async fn element_text(&self, elem: &ElementRef) -> Result<String> {
        self.command(Method::GET, &format!("element/{}/text", elem.id), None)
            .await
    }

    /// Capture the viewport as PNG bytes
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let encoded: String = self.command(Method::GET, "screenshot", None).await?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| Error::Protocol(format!("Invalid screenshot encoding: {}", e)))
    }

    /// End the session and close the browser
    pub async fn delete(self) -> Result<()> {
        let path = format!("session/{}", self.id);
        self.client
            .execute::<Value>(Method::DELETE, &path, None)
            .await?;
        tracing::info!(session = %self.id, "Browser session closed");
        Ok(())
    }
}
