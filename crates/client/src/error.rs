//! Errors at the Job API boundary.

use thiserror::Error;

/// Errors surfaced by [`crate::ExportApi`] operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: connect, timeout, TLS, body read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// Platform error code from the response body, when present.
        code: Option<i64>,
        message: String,
    },

    /// The response body was not the JSON this client expects.
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The creation payload failed validation; no request was issued.
    #[error("Invalid export request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),
}

impl ApiError {
    /// User-presentable message for create-job failures.
    ///
    /// API-reported messages pass through verbatim; everything else is
    /// summarized via `Display`.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
