// oltnms-api: Async Rust client for the ZTE OLT/ONU network management REST API
//
// One `ApiClient` covers every endpoint group. Credentials are read from a
// pluggable `CredentialStorage` on each request; a 401 clears them and fires
// the registered `UnauthorizedHandler`.

pub mod client;
pub mod error;
pub mod storage;
pub mod transport;
pub mod types;

mod activity;
mod alarms;
mod auth;
mod dashboard;
mod maps;
mod monitoring;
mod olts;
mod onus;
mod provisioning;

pub use client::{ApiClient, Payload, UnauthorizedHandler};
pub use error::Error;
pub use storage::{CredentialStorage, FileStorage, MemoryStorage, StorageError, TOKEN_KEY, USER_KEY};
pub use transport::{TlsMode, TransportConfig};
