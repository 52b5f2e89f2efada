//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use oltnms_config::ConfigError;
use oltnms_core::{CoreError, Redirect};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the NMS backend at {url}")]
    #[diagnostic(
        code(oltnms::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Override the address with --base-url or OLTNMS_BASE_URL."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(oltnms::timeout),
        help("Increase the limit with --timeout, or check backend responsiveness.")
    )]
    Timeout,

    // ── Session ──────────────────────────────────────────────────────

    #[error("Not logged in")]
    #[diagnostic(code(oltnms::not_logged_in), help("Run: oltnms auth login --profile {profile}"))]
    NotLoggedIn { profile: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(oltnms::auth_failed),
        help(
            "Log in again with: oltnms auth login --profile {profile}\n\
             To keep the password out of prompts: oltnms config set-password"
        )
    )]
    AuthFailed { message: String, profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(oltnms::not_found),
        help("Run: oltnms {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Cannot move alarm from {from} to {to}")]
    #[diagnostic(
        code(oltnms::invalid_transition),
        help("Alarms go active -> acknowledged -> cleared, or straight from active to cleared.")
    )]
    InvalidTransition { from: String, to: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(oltnms::api_error))]
    Api { message: String, status: Option<u16> },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(oltnms::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(oltnms::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: oltnms config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(oltnms::config))]
    Config(#[from] ConfigError),

    #[error("Session storage error: {message}")]
    #[diagnostic(code(oltnms::storage), help("Check permissions on the data directory."))]
    Storage { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(oltnms::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(oltnms::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(oltnms::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(oltnms::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotLoggedIn { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidTransition { .. } => exit_code::CONFLICT,
            Self::Api { status: Some(403), .. } => exit_code::PERMISSION,
            Self::Api { status: Some(409), .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to session errors so the help text
    /// points at the right login command.
    pub fn for_profile(self, name: &str) -> Self {
        match self {
            Self::NotLoggedIn { .. } => Self::NotLoggedIn { profile: name.into() },
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.into(),
            },
            other => other,
        }
    }

    /// Resolve the generic 404 of a direct lookup to the entity asked for.
    pub fn not_found(kind: &str, id: impl ToString, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: kind.into(),
            identifier: id.to_string(),
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => CliError::NotLoggedIn {
                profile: "default".into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(entity_type).into(),
                resource_type: entity_type.into(),
                identifier,
            },

            CoreError::Validation { field, reason } => CliError::Validation {
                field: field.into(),
                reason,
            },

            CoreError::InvalidTransition { from, to } => CliError::InvalidTransition { from, to },

            CoreError::Api { message, status } => CliError::Api { message, status },

            CoreError::Storage { message } => CliError::Storage { message },

            CoreError::Config { message } => CliError::Validation {
                field: "base_url".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<Redirect> for CliError {
    fn from(_: Redirect) -> Self {
        CliError::NotLoggedIn {
            profile: "default".into(),
        }
    }
}

fn list_command_for(entity_type: &str) -> &'static str {
    match entity_type {
        "OLT" => "olts list",
        "ONU" => "onus list",
        "Alarm" => "alarms list",
        _ => "dashboard stats",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_exit_with_auth_code() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "Token expired".into(),
        })
        .for_profile("lab");
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(matches!(err, CliError::AuthFailed { ref profile, .. } if profile == "lab"));
    }

    #[test]
    fn not_found_points_at_the_list_command() {
        let err = CliError::from(CoreError::NotFound {
            entity_type: "ONU",
            identifier: "12".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(matches!(err, CliError::NotFound { ref list_command, .. } if list_command == "onus list"));
    }

    #[test]
    fn validation_is_a_usage_error() {
        let err = CliError::from(CoreError::Validation {
            field: "pon_port",
            reason: "must be between 1 and 16".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Invalid value for pon_port: must be between 1 and 16");
    }

    #[test]
    fn forbidden_maps_to_permission() {
        let err = CliError::from(CoreError::Api {
            message: "Admin privileges required".into(),
            status: Some(403),
        });
        assert_eq!(err.exit_code(), exit_code::PERMISSION);
    }
}
