use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Missing or unusable credential
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    Validation(String),

    /// A result resource expired or was never materialized
    #[error("not found: {0}")]
    NotFound(String),

    /// The credential was invalidated while an operation was in flight
    #[error("authorization lost: {0}")]
    AuthorizationLost(String),

    #[error("{0}")]
    Transport(String),
}

impl BackendError {
    pub fn is_authorization_lost(&self) -> bool {
        matches!(self, BackendError::AuthorizationLost(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(value: reqwest::Error) -> Self {
        BackendError::Transport(value.to_string())
    }
}

#[derive(Default, Debug, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: GeminiError,
}

#[derive(Default, Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiError {
    #[serde(skip)]
    pub http_code: u16,
    #[serde(default)]
    pub message: String,
    pub code: Option<u16>,
    pub status: Option<String>,
}

impl GeminiError {
    /// Parse an error body, falling back to the raw text when it is not the
    /// usual `{"error": {...}}` envelope
    pub(crate) fn from_body(http_code: u16, body: &str) -> Self {
        let mut err = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(resp) => resp.error,
            Err(_) => GeminiError {
                message: body.trim().to_string(),
                ..Default::default()
            },
        };
        err.http_code = http_code;
        err
    }
}

impl Display for GeminiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gemini error ({}): {}", self.http_code, self.message)
    }
}

impl From<GeminiError> for BackendError {
    fn from(value: GeminiError) -> Self {
        let status = value.status.as_deref().unwrap_or_default();
        match value.http_code {
            401 | 403 => BackendError::AuthorizationLost(value.message),
            // The service answers this way when the key behind a running
            // operation is no longer valid
            404 if value.message.contains("Requested entity was not found") => {
                BackendError::AuthorizationLost(value.message)
            }
            400 if status == "INVALID_ARGUMENT" && value.message.contains("API key") => {
                BackendError::Configuration(value.message)
            }
            _ => BackendError::Transport(value.to_string()),
        }
    }
}
