//! Uniform result shape for every API call. A response is either a success with
//! its decoded body or a failure with an [`ApiError`]; the type makes the "exactly
//! one of data/error" rule impossible to break.

use super::error::{ApiError, ClientError};
use serde::{Serialize, Serializer, de::DeserializeOwned};
use serde_json::Value;

/// Maximum number of characters kept from a server-provided error message.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq)]
pub enum Envelope {
    Success { status: u16, data: Value },
    Failure { status: u16, error: ApiError },
}

impl Envelope {
    /// Builds the envelope for a decoded response body.
    #[must_use]
    pub fn from_response(status: u16, body: Value) -> Self {
        if (200..300).contains(&status) {
            Self::Success { status, data: body }
        } else {
            Self::Failure {
                status,
                error: error_from_body(status, &body),
            }
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// # Errors
    /// Returns [`ClientError::Api`] for a failed envelope.
    pub fn into_result(self) -> Result<Value, ClientError> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { status, error } => Err(ClientError::Api { status, error }),
        }
    }

    /// Decodes a successful payload into `T` at the edge.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] for a failed envelope and
    /// [`ClientError::Decode`] when the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(self, endpoint: &str) -> Result<T, ClientError> {
        let data = self.into_result()?;
        serde_json::from_value(data).map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[derive(Serialize)]
struct Wire<'a> {
    success: bool,
    data: Option<&'a Value>,
    error: Option<&'a ApiError>,
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Wire {
            success: self.is_success(),
            data: self.data(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Extracts the error from a failed response body.
///
/// Looks at `error` as an object, then `error` as a string, then `message`, and
/// falls back to a generic message for the status.
fn error_from_body(status: u16, body: &Value) -> ApiError {
    let top_code = body.get("code").and_then(code_text);

    match body.get("error") {
        Some(Value::Object(fields)) => {
            let message = fields
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.trim().is_empty())
                .map_or_else(|| fallback_message(status), sanitize);
            let code = fields.get("code").and_then(code_text).or(top_code);
            return ApiError::new(message, code);
        }
        Some(Value::String(message)) if !message.trim().is_empty() => {
            return ApiError::new(sanitize(message), top_code);
        }
        _ => {}
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map_or_else(|| fallback_message(status), sanitize);

    ApiError::new(message, top_code)
}

fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(code) if !code.is_empty() => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

fn fallback_message(status: u16) -> String {
    format!("Request failed with status {status}")
}

fn sanitize(message: &str) -> String {
    message.trim().chars().take(MAX_ERROR_CHARS).collect()
}
