// ── Runtime connection configuration ──
//
// Describes how to reach the backend. The frontend builds an `NmsConfig`
// from its own config sources and hands it in; core never reads files.

use std::path::PathBuf;
use std::time::Duration;

use oltnms_api::{TlsMode, TransportConfig};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab backends).
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct NmsConfig {
    /// Backend origin, e.g. `http://nms.local:8000`. `/api/` is appended.
    pub base_url: String,
    pub tls: TlsVerification,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Period for lists started with auto-refresh.
    pub refresh_interval: Duration,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            tls: TlsVerification::default(),
            timeout: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl NmsConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
