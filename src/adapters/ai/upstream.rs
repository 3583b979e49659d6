//! HTTP plumbing shared by the hosted provider adapters.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::ports::AIError;

/// Builds the HTTP client, keeping a build failure as a value.
///
/// The error surfaces as [`AIError::Network`] on the first call instead of
/// aborting startup.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, String> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| format!("failed to create HTTP client: {}", e))
}

/// Maps a reqwest send/read failure.
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else if err.is_connect() {
        AIError::network("connection to provider failed")
    } else {
        // Strip the URL so query strings never reach a caller.
        AIError::network(err.without_url().to_string())
    }
}

/// Maps a non-2xx response to the error taxonomy.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> AIError {
    let message = extract_error_message(body)
        .unwrap_or_else(|| format!("provider returned {}", status));

    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed(message),
        429 => AIError::rate_limited(message),
        400 | 404 | 422 => AIError::InvalidRequest(message),
        500..=599 => AIError::unavailable(message),
        _ => AIError::network(message),
    }
}

/// Pulls `error.message` out of a `{"error": {"message": ...}}` body.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = parsed.get("error")?.get("message")?.as_str()?.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Invalid API Key"));
    }

    #[test]
    fn ignores_bodies_without_error_message() {
        assert_eq!(extract_error_message("<html>bad gateway</html>"), None);
        assert_eq!(extract_error_message(r#"{"error":"flat"}"#), None);
        assert_eq!(extract_error_message(r#"{"error":{"message":"  "}}"#), None);
    }

    #[test]
    fn status_codes_map_to_taxonomy() {
        let body = r#"{"error":{"message":"nope"}}"#;

        assert!(matches!(
            error_from_status(StatusCode::UNAUTHORIZED, body),
            AIError::AuthenticationFailed(ref m) if m == "nope"
        ));
        assert!(matches!(
            error_from_status(StatusCode::TOO_MANY_REQUESTS, body),
            AIError::RateLimited { .. }
        ));
        assert!(matches!(
            error_from_status(StatusCode::BAD_REQUEST, body),
            AIError::InvalidRequest(_)
        ));
        assert!(matches!(
            error_from_status(StatusCode::SERVICE_UNAVAILABLE, body),
            AIError::Unavailable { .. }
        ));
    }

    #[test]
    fn falls_back_to_status_line() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.caller_message(), "provider returned 502 Bad Gateway");
    }
}
