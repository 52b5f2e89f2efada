// ── Core error types ──
//
// User-facing errors from oltnms-core. The `From<oltnms_api::Error>` impl
// translates transport-layer failures into domain variants; callers match
// on these rather than on raw HTTP details.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Not logged in")]
    NotAuthenticated,

    /// The backend rejected the credentials or the stored token.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to backend timed out")]
    Timeout,

    // ── Data ─────────────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Client-side form validation, raised before any request is sent.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Cannot move alarm from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    // ── Backend ──────────────────────────────────────────────────────
    /// Any other error response. `message` is the server's explanation.
    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    // ── Local ────────────────────────────────────────────────────────
    #[error("Credential storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP status code, when the backend responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<oltnms_api::Error> for CoreError {
    fn from(err: oltnms_api::Error) -> Self {
        match err {
            oltnms_api::Error::Unauthorized { message } => CoreError::AuthenticationFailed { message },
            oltnms_api::Error::Http {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "resource",
                identifier: message,
            },
            oltnms_api::Error::Http { status, message, .. } => CoreError::Api {
                message,
                status: Some(status),
            },
            oltnms_api::Error::Network(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e.url().map(ToString::to_string).unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            oltnms_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            oltnms_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            oltnms_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response: {message}"))
            }
            oltnms_api::Error::Serialization(e) => CoreError::Internal(format!("Cannot encode request: {e}")),
            oltnms_api::Error::Storage(e) => CoreError::Storage { message: e.to_string() },
        }
    }
}

impl From<oltnms_api::StorageError> for CoreError {
    fn from(err: oltnms_api::StorageError) -> Self {
        CoreError::Storage {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_keep_status_and_message() {
        let err: CoreError = oltnms_api::Error::Http {
            status: 400,
            message: "Serial number already exists".into(),
            body: None,
        }
        .into();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Serial number already exists");
    }

    #[test]
    fn not_found_is_recognised() {
        let err: CoreError = oltnms_api::Error::Http {
            status: 404,
            message: "ONU not found".into(),
            body: None,
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn unauthorized_is_auth_failure() {
        let err: CoreError = oltnms_api::Error::Unauthorized {
            message: "Incorrect email or password".into(),
        }
        .into();
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "Authentication failed: Incorrect email or password");
    }
}
