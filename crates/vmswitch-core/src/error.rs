// ── Core error types ──
//
// User-facing errors from vmswitch-core. Consumers never match on raw
// reqwest errors; the `From<vmswitch_api::Error>` impl translates the
// transport/protocol/decode taxonomy into domain-appropriate variants.

use thiserror::Error;

use crate::reconciler::ReconcilerState;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to switcher daemon at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to switcher daemon timed out")]
    Timeout,

    // ── Daemon responses ─────────────────────────────────────────────
    #[error("Domain not found: {identifier}")]
    NotFound { identifier: String },

    /// 4xx other than 404: the daemon refused the change (e.g. 409 when
    /// the domain is already running).
    #[error("Request rejected by daemon (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Daemon error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from daemon: {message}")]
    Decode { message: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Cannot {action} reconciler in state {from}")]
    InvalidTransition {
        from: ReconcilerState,
        action: &'static str,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vmswitch_api::Error> for CoreError {
    fn from(err: vmswitch_api::Error) -> Self {
        match err {
            vmswitch_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            vmswitch_api::Error::Transport(e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            vmswitch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vmswitch_api::Error::Protocol { status: 404, message } => {
                CoreError::NotFound { identifier: message }
            }
            vmswitch_api::Error::Protocol { status, message } if (400..500).contains(&status) => {
                CoreError::Rejected { status, message }
            }
            vmswitch_api::Error::Protocol { status, message } => CoreError::Api { status, message },
            vmswitch_api::Error::Decode { message, body: _ } => CoreError::Decode { message },
        }
    }
}
