use std::path::PathBuf;
use std::time::Duration;

use surmado_core::{ConfigError, RequestError};
use thiserror::Error;

/// Errors returned by the Surmado API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    ///
    /// `body` holds the parsed JSON error body when the service sent one.
    #[error("API error (HTTP {status}): {}", api_detail(.status, .body.as_ref()))]
    Api {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// A 2xx body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service reported the report as failed.
    #[error("report {report_id} failed: {error}")]
    ReportFailed { report_id: String, error: String },

    /// Polling ran out of time before the report reached a terminal state.
    #[error("report {report_id} did not complete within {timeout:?}")]
    Timeout {
        report_id: String,
        timeout: Duration,
    },

    /// The caller's cancellation token fired while waiting.
    #[error("waiting for report {report_id} was cancelled")]
    Cancelled { report_id: String },

    #[error("invalid report request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing a downloaded artifact to disk failed.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// HTTP status carried by an [`ClientError::Api`] error.
    #[must_use]
    pub fn api_status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Human-readable detail for an API error: the service's own message when the
/// body has one, the compact body otherwise, the status reason as a last resort.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn api_detail(status: &u16, body: Option<&serde_json::Value>) -> String {
    let message = body.and_then(|b| {
        ["error", "message", "detail"]
            .iter()
            .find_map(|key| b.get(*key).and_then(serde_json::Value::as_str))
    });

    match (message, body) {
        (Some(msg), _) => msg.to_string(),
        (None, Some(b)) => b.to_string(),
        (None, None) => reqwest::StatusCode::from_u16(*status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("no response body")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_service_message() {
        let err = ClientError::Api {
            status: 402,
            body: Some(serde_json::json!({"error": "insufficient credits"})),
        };
        assert_eq!(err.to_string(), "API error (HTTP 402): insufficient credits");
    }

    #[test]
    fn api_error_falls_back_to_body_json() {
        let err = ClientError::Api {
            status: 422,
            body: Some(serde_json::json!({"fields": ["email"]})),
        };
        assert_eq!(err.to_string(), r#"API error (HTTP 422): {"fields":["email"]}"#);
    }

    #[test]
    fn api_error_without_body_uses_status_reason() {
        let err = ClientError::Api {
            status: 503,
            body: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): Service Unavailable");
        assert_eq!(err.api_status(), Some(503));
    }

    #[test]
    fn timeout_message_names_report() {
        let err = ClientError::Timeout {
            report_id: "rpt_abc123".to_string(),
            timeout: Duration::from_secs(300),
        };
        assert_eq!(
            err.to_string(),
            "report rpt_abc123 did not complete within 300s"
        );
    }
}
