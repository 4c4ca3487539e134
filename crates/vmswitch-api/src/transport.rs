// Shared transport configuration for building reqwest::Client instances.
//
// The daemon speaks plain HTTP on a local address, so the only tuning
// knobs are the request and connect timeouts.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on a whole request, response body included.
    pub timeout: Duration,
    /// Upper bound on establishing the TCP connection.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

impl TransportConfig {
    /// Config with the given request timeout and the default connect timeout.
    ///
    /// The connect timeout never exceeds the request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let defaults = Self::default();
        Self {
            timeout,
            connect_timeout: defaults.connect_timeout.min(timeout),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(concat!("vmswitch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_timeout_caps_connect_timeout() {
        let cfg = TransportConfig::with_timeout(Duration::from_secs(1));
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(1));

        let cfg = TransportConfig::with_timeout(Duration::from_secs(10));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(3));
    }
}
