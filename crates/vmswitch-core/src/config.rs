// ── Runtime client configuration ──
//
// These types describe *where* the daemon lives and *how often* to poll
// it. They never touch disk: `vmswitch-config` (or any other front-end)
// builds a `ClientConfig` and hands it in.

use std::time::Duration;

use url::Url;
use vmswitch_api::{DomainClient, TransportConfig};

use crate::error::CoreError;

/// Delay before the first poll after `start()`. Small but never zero.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1);

/// Gap between the end of one successful poll and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Gap between a failed poll and its retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(3000);

/// Per-request timeout; bounds how long a poll can stay in `Fetching`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Cadence of the [`PollingReconciler`](crate::PollingReconciler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    pub initial_delay: Duration,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl PollTiming {
    /// Reject zero durations, which would turn the poll loop into a busy loop.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("initial_delay", self.initial_delay),
            ("poll_interval", self.poll_interval),
            ("retry_delay", self.retry_delay),
        ] {
            if value.is_zero() {
                return Err(CoreError::Config {
                    message: format!("{field} must be greater than zero"),
                });
            }
        }
        Ok(())
    }
}

/// Configuration for talking to a single switcher daemon.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Daemon base URL (e.g., `http://192.168.122.1:8000`).
    pub api_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Poll cadence for the reconciler.
    pub timing: PollTiming,
}

impl ClientConfig {
    /// Config for `api_url` with default timeout and cadence.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            timing: PollTiming::default(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(self.timeout)
    }

    /// Build the HTTP client described by this config.
    pub fn build_client(&self) -> Result<DomainClient, CoreError> {
        Ok(DomainClient::new(self.api_url.clone(), &self.transport())?)
    }
}
