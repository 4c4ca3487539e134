//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use vmswitch_config::ConfigError;
use vmswitch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to switcher daemon at {url}")]
    #[diagnostic(
        code(vmswitch::connection_failed),
        help(
            "Check that the daemon is running and reachable from this machine.\n\
             URL: {url}\n\
             Override with --api-url or configure a profile: vmswitch config init"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to switcher daemon timed out")]
    #[diagnostic(
        code(vmswitch::timeout),
        help("Increase the timeout with --timeout or check daemon responsiveness.")
    )]
    Timeout,

    // ── Daemon responses ─────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(vmswitch::not_found),
        help("Run: vmswitch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Daemon refused the request: {message}")]
    #[diagnostic(code(vmswitch::conflict))]
    Conflict { message: String },

    #[error("Daemon error (HTTP {status}): {message}")]
    #[diagnostic(code(vmswitch::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from daemon: {message}")]
    #[diagnostic(
        code(vmswitch::decode),
        help("Check that --api-url points at the switcher daemon and not another service.")
    )]
    Decode { message: String },

    #[error("{message}")]
    #[diagnostic(code(vmswitch::command_failed))]
    CommandFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vmswitch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vmswitch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vmswitch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(vmswitch::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(vmswitch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(vmswitch::internal))]
    Internal { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(vmswitch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(vmswitch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound { identifier } => CliError::NotFound {
                resource_type: "domain".into(),
                identifier,
                list_command: "domains list".into(),
            },

            CoreError::Rejected { status: 409, message } => CliError::Conflict { message },

            CoreError::Rejected { status, message } | CoreError::Api { status, message } => {
                CliError::ApiError { status, message }
            }

            CoreError::Decode { message } => CliError::Decode { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            e @ CoreError::InvalidTransition { .. } => CliError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<vmswitch_core::ApiError> for CliError {
    fn from(err: vmswitch_core::ApiError) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let conn = CliError::from(CoreError::ConnectionFailed {
            url: "http://192.168.122.1:8000/api/domain".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);

        let missing = CliError::from(CoreError::NotFound {
            identifier: "Domain not found".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn conflict_is_distinguished_from_other_rejections() {
        let conflict = CliError::from(CoreError::Rejected {
            status: 409,
            message: "Domain already active".into(),
        });
        assert_eq!(conflict.exit_code(), exit_code::CONFLICT);
        assert_eq!(
            conflict.to_string(),
            "Daemon refused the request: Domain already active"
        );

        let bad_request = CliError::from(CoreError::Rejected {
            status: 400,
            message: "Only starting a VM is supported".into(),
        });
        assert!(matches!(bad_request, CliError::ApiError { status: 400, .. }));
        assert_eq!(bad_request.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "api_url".into(),
            reason: "missing host".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
