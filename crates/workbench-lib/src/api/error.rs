//! Transport-level errors from the prediction API

use thiserror::Error;

/// Fallback message when a rejection body carries no `message`
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The request went out but nothing usable came back
    #[error("no response from server: {0}")]
    NoResponse(String),

    /// The request could not be built or sent
    #[error("request setup failed: {0}")]
    Setup(String),

    /// A success status whose body did not match the expected shape
    #[error("failed to decode response ({status}): {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    /// Classify a reqwest error by the stage at which it occurred
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Setup(err.to_string())
        } else {
            Self::NoResponse(err.to_string())
        }
    }

    /// Build a status error from the raw response body
    pub(crate) fn from_rejection(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: rejection_message(body),
        }
    }
}

/// Pull `message` out of a JSON error body
pub fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
}
