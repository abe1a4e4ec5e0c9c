use overlay_core::ServiceError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid server URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

pub(crate) fn transport(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Transport(format!("Request timed out: {}", err))
    } else {
        ServiceError::Transport(err.to_string())
    }
}

/// The user-facing message of a failed response body.
///
/// The service reports errors as `{"error": "..."}`; anything else is passed
/// through untouched.
pub(crate) fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
