use thiserror::Error;

use crate::storage::StorageError;

/// Top-level error type for the `oltnms-api` crate.
///
/// Three families matter to callers: network failures (no response at all),
/// HTTP error responses (carry a status code), and the special-cased 401.
/// `oltnms-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP responses ──────────────────────────────────────────────
    /// The backend answered 401. Stored credentials have already been
    /// cleared and the unauthorized handler notified. `message` is the
    /// server's `detail` (e.g. "Incorrect email or password").
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response. `message` is the server's `detail` or
    /// `message` field when present, else `"HTTP {status}"`.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        /// Parsed error payload (JSON value, or the raw text as a JSON string).
        body: Option<serde_json::Value>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS failure, ...).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    // ── Credential storage ──────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// HTTP status code, present only when the backend actually responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Returns `true` if no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Extract the human-readable message from an error payload.
///
/// Prefers `detail`, then `message`. FastAPI validation failures put a list
/// of `{loc, msg}` objects in `detail`; their `msg` fields are joined.
pub(crate) fn error_message(status: u16, body: Option<&serde_json::Value>) -> String {
    let fallback = || format!("HTTP {status}");
    let Some(obj) = body.and_then(serde_json::Value::as_object) else {
        return fallback();
    };

    match obj.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
        Some(serde_json::Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return joined;
            }
        }
        _ => {}
    }

    match obj.get("message") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        _ => fallback(),
    }
}
