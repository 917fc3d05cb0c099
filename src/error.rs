//! Error type shared by the request pipeline, the token store and the API layer.

use thiserror::Error;

/// Errors surfaced to callers of the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status other than a recoverable 401.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The session is gone: no refresh token, or the retried request was rejected again.
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// The refresh call itself failed; the session has been cleared.
    #[error("token refresh failed: {0}")]
    Refresh(String),

    /// A response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Reading or writing persisted client state failed.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Builds a [`ApiError::Status`] from a raw response body.
    ///
    /// The server's own `message` (or `error`) field wins; a non-JSON body is
    /// used verbatim; an empty body falls back to the status line.
    pub fn from_status(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            message: server_message(body).unwrap_or_else(|| format!("HTTP {status}")),
        }
    }

    /// The text a screen would show to the user for this error.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Network(message)
            | ApiError::Unauthorized(message)
            | ApiError::Refresh(message)
            | ApiError::Decode(message)
            | ApiError::Storage(message)
            | ApiError::Config(message) => message.clone(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// True when the error ended the session.
    pub fn is_session_ended(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::Refresh(_))
    }
}

fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => {
            let field = value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|v| v.as_str().or_else(|| v.get("message")?.as_str()));
            Some(field.map(str::to_owned).unwrap_or_else(|| value.to_string()))
        }
        Err(_) => Some(trimmed.to_string()),
    }
}
