use crate::session::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error reported by the server inside a failed envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(formatter, "[{code}] {}", self.message),
            None => formatter.write_str(&self.message),
        }
    }
}

/// Failures raised by the API client. HTTP failure statuses are not errors; they
/// come back as failed envelopes and only become [`ClientError::Api`] when a caller
/// asks for a typed payload.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unable to reach the server: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("failed to decode response body (status {status}): {source}")]
    FailedJsonParse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to build multipart body: {0}")]
    Multipart(String),
    #[error("unexpected payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("request failed ({status}): {error}")]
    Api { status: u16, error: ApiError },
    #[error(transparent)]
    Session(#[from] StoreError),
}

impl ClientError {
    /// Stable error code, suitable for display next to the message.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Transport(_) => "NETWORK",
            Self::Timeout(_) => "TIMEOUT",
            Self::FailedJsonParse { .. } => "FAILED_JSON_PARSE",
            Self::Encode(_) => "ENCODE",
            Self::Multipart(_) => "MULTIPART",
            Self::Decode { .. } => "DECODE",
            Self::Api { error, .. } => error.code.as_deref().unwrap_or("API"),
            Self::Session(_) => "SESSION",
        }
    }

    /// Status carried by an API error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::FailedJsonParse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }
}
