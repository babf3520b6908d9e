//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connect and overall request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections kept per host in the pool.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 8;

/// Settings for [`crate::HttpCsparqlClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the REST API, e.g. `http://localhost:8175/csparql-server/api/1`.
    pub base_url: String,

    /// Timeout in milliseconds, used for both connecting and the whole
    /// exchange.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

impl ClientConfig {
    /// Configuration with default timeout and pool size.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: default_timeout_ms(),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Sets the timeout, rounded up to whole milliseconds (at least 1 ms).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000).max(1);
        self.timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_secs() * 1000
}

fn default_pool_max_idle_per_host() -> usize {
    DEFAULT_POOL_MAX_IDLE_PER_HOST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost:8175/csparql-server/api/1"}"#)
                .unwrap();
        assert_eq!(config, ClientConfig::new("http://localhost:8175/csparql-server/api/1"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn timeouts_keep_fractional_seconds() {
        let config = ClientConfig::new("http://h").with_timeout(Duration::from_millis(1900));
        assert_eq!(config.timeout(), Duration::from_millis(1900));

        let config = ClientConfig::new("http://h").with_timeout(Duration::from_millis(200));
        assert_eq!(config.timeout(), Duration::from_millis(200));
    }

    #[test]
    fn timeouts_round_up_to_the_next_millisecond() {
        let config = ClientConfig::new("http://h").with_timeout(Duration::from_micros(1500));
        assert_eq!(config.timeout_ms, 2);

        let config = ClientConfig::new("http://h").with_timeout(Duration::ZERO);
        assert_eq!(config.timeout_ms, 1);
    }
}
