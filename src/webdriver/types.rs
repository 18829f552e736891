//! W3C WebDriver message types
//!
//! Only the subset of the protocol the page objects use.
//! See: https://www.w3.org/TR/webdriver2/

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::common::config::DriverKind;

// === Session ===

/// New session request body
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRequest {
    pub capabilities: CapabilitiesRequest,
}

/// Capability negotiation block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
    pub always_match: Value,
}

/// New session response value
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
    pub session_id: String,
    #[serde(default)]
    pub capabilities: Value,
}

/// Driver status response value
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub ready: bool,
    #[serde(default)]
    pub message: String,
}

/// Session timeouts in milliseconds
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_load: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<u64>,
}

// === Navigation ===

#[derive(Debug, Clone, Serialize)]
pub struct UrlRequest {
    pub url: String,
}

// === Elements ===

#[derive(Debug, Clone, Serialize)]
pub struct FindElementRequest {
    pub using: String,
    pub value: String,
}

/// Opaque element handle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendKeysRequest {
    pub text: String,
}

// === Errors ===

/// Error value carried in a failed response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorValue {
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stacktrace: Option<String>,
}

/// Build `alwaysMatch` capabilities for the given browser
pub fn browser_capabilities(kind: DriverKind, headless: bool, extra_args: &[String]) -> Value {
    match kind {
        DriverKind::Chromedriver => {
            let mut args: Vec<String> = vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--window-size=1280,720".to_string(),
            ];
            if headless {
                args.push("--headless=new".to_string());
            }
            args.extend(extra_args.iter().cloned());
            json!({
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args }
            })
        }
        DriverKind::Geckodriver => {
            let mut args: Vec<String> = vec!["--width=1280".to_string(), "--height=720".to_string()];
            if headless {
                args.push("-headless".to_string());
            }
            args.extend(extra_args.iter().cloned());
            json!({
                "browserName": "firefox",
                "moz:firefoxOptions": { "args": args }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ref_uses_w3c_key() {
        let value = json!({ "element-6066-11e4-a52e-4f735466cecf": "abc-123" });
        let elem: ElementRef = serde_json::from_value(value).unwrap();
        assert_eq!(elem.id, "abc-123");
    }

    #[test]
    fn test_new_session_response_keeps_capabilities() {
        let value = json!({
            "sessionId": "s-1",
            "capabilities": { "browserName": "chrome", "browserVersion": "126.0" }
        });
        let response: NewSessionResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.session_id, "s-1");
        assert_eq!(response.capabilities["browserVersion"], "126.0");
    }

    #[test]
    fn test_new_session_request_shape() {
        let req = NewSessionRequest {
            capabilities: CapabilitiesRequest {
                always_match: json!({ "browserName": "chrome" }),
            },
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["capabilities"]["alwaysMatch"]["browserName"], "chrome");
    }

    #[test]
    fn test_timeouts_skip_unset_fields() {
        let req = TimeoutsRequest {
            page_load: Some(30_000),
            implicit: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "pageLoad": 30000 }));
    }

    #[test]
    fn test_chrome_headless_capabilities() {
        let caps = browser_capabilities(DriverKind::Chromedriver, true, &["--lang=en".into()]);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert!(args.iter().any(|a| a == "--lang=en"));
    }

    #[test]
    fn test_firefox_headed_capabilities() {
        let caps = browser_capabilities(DriverKind::Geckodriver, false, &[]);
        assert_eq!(caps["browserName"], "firefox");
        let args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "-headless"));
    }
}
