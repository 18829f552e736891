//! WebDriver response decoding
//!
//! Every response body is a JSON object with a single `value` member:
//! ```text
//! {"value": <result>}
//! {"value": {"error": "<code>", "message": "...", "stacktrace": "..."}}
//! ```
//! Error codes are mapped onto the crate's error taxonomy here so callers
//! can match on `ElementNotFound` and `Timeout` without string checks.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::common::{Error, Result};

use super::types::ErrorValue;

/// Error code for a missing element
pub const NO_SUCH_ELEMENT: &str = "no such element";
/// Error code for an element that left the DOM
pub const STALE_ELEMENT: &str = "stale element reference";

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Value,
}

/// Decode a response body into `T`, or into the matching error
pub fn decode<T: DeserializeOwned>(status: u16, body: &str, command: &str) -> Result<T> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        Error::Protocol(format!(
            "Invalid JSON in {} response (HTTP {}): {}",
            command, status, e
        ))
    })?;

    if let Some(err) = error_value(&envelope.value) {
        return Err(map_error(&err));
    }

    if !(200..300).contains(&status) {
        return Err(Error::Protocol(format!(
            "{} returned HTTP {} without an error value",
            command, status
        )));
    }

    serde_json::from_value(envelope.value)
        .map_err(|e| Error::Protocol(format!("Failed to parse {} response: {}", command, e)))
}

fn error_value(value: &Value) -> Option<ErrorValue> {
    if value.get("error").and_then(Value::as_str).is_some() {
        serde_json::from_value(value.clone()).ok()
    } else {
        None
    }
}

/// Map a wire error onto [`Error`]
pub fn map_error(err: &ErrorValue) -> Error {
    if let Some(trace) = &err.stacktrace {
        tracing::trace!(code = %err.error, "WebDriver stacktrace: {}", trace);
    }

    match err.error.as_str() {
        NO_SUCH_ELEMENT => Error::ElementNotFound(err.message.clone()),
        "session not created" => Error::SessionFailed(err.message.clone()),
        _ => Error::webdriver(&err.error, &err.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webdriver::types::{ElementRef, StatusResponse};

    #[test]
    fn test_decode_success_value() {
        let status: StatusResponse =
            decode(200, r#"{"value":{"ready":true,"message":"ok"}}"#, "status").unwrap();
        assert!(status.ready);
        assert_eq!(status.message, "ok");
    }

    #[test]
    fn test_decode_null_value_as_unit() {
        decode::<()>(200, r#"{"value":null}"#, "navigate").unwrap();
    }

    #[test]
    fn test_decode_no_such_element() {
        let body = r#"{"value":{"error":"no such element","message":"Unable to locate #x","stacktrace":""}}"#;
        let err = decode::<ElementRef>(404, body, "find element").unwrap_err();
        match err {
            Error::ElementNotFound(msg) => assert!(msg.contains("#x")),
            other => panic!("Expected ElementNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_timeout_keeps_driver_message() {
        let body = r#"{"value":{"error":"timeout","message":"timeout: Timed out receiving message from renderer: 30.000"}}"#;
        let err = decode::<()>(500, body, "navigate").unwrap_err();
        assert!(matches!(err, Error::WebDriver { ref code, .. } if code == "timeout"));
        assert!(err.to_string().contains("Timed out receiving message from renderer"));
    }

    #[test]
    fn test_decode_other_code() {
        let body = r#"{"value":{"error":"invalid session id","message":"gone"}}"#;
        match decode::<()>(404, body, "url").unwrap_err() {
            Error::WebDriver { code, message } => {
                assert_eq!(code, "invalid session id");
                assert_eq!(message, "gone");
            }
            other => panic!("Expected WebDriver error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_http_error_without_value() {
        assert!(matches!(
            decode::<()>(500, r#"{"value":null}"#, "click").unwrap_err(),
            Error::Protocol(_)
        ));
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(matches!(
            decode::<()>(200, "<html>", "status").unwrap_err(),
            Error::Protocol(_)
        ));
    }
}
