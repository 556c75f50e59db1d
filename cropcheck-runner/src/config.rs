//! Runner configuration
//!
//! Defines all configurable parameters for a run: where the service lives,
//! which API version to speak, where samples are, and how polling behaves.

use cropcheck_core::ProtocolVersion;
use std::path::PathBuf;
use std::time::Duration;

/// Run configuration
///
/// All timeouts and intervals are configurable to allow tuning for a local
/// service versus a remote one.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// API version selected once at startup
    pub protocol: ProtocolVersion,

    /// Folder whose subfolders are the samples
    pub samples_root: PathBuf,

    /// Pause between poll rounds
    pub poll_interval: Duration,

    /// Upper bound on every single HTTP call
    pub request_timeout: Duration,

    /// Max status requests in flight during one round
    pub max_parallel_polls: usize,

    /// Consecutive poll failures after which a job is abandoned; `None` retries forever
    pub max_poll_failures: Option<u32>,

    /// Overall polling deadline; `None` polls until every job is terminal
    pub run_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(base_url: String, protocol: ProtocolVersion) -> Self {
        Self {
            base_url,
            protocol,
            samples_root: PathBuf::from("samples/images"),
            poll_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            max_parallel_polls: 8,
            max_poll_failures: None,
            run_timeout: None,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.max_parallel_polls == 0 {
            anyhow::bail!("max_parallel_polls must be greater than 0");
        }

        if self.max_poll_failures == Some(0) {
            anyhow::bail!("max_poll_failures must be greater than 0 when set");
        }

        if self.run_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("run_timeout must be greater than 0 when set");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000".to_string(), ProtocolVersion::V2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.protocol, ProtocolVersion::V2);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.samples_root, PathBuf::from("samples/images"));
        assert!(config.max_poll_failures.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Invalid URL should fail
        config.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());
        config.base_url = "https://crop.example".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_interval = Duration::from_millis(250);
        assert!(config.validate().is_ok());

        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.request_timeout = Duration::from_secs(1);

        config.max_parallel_polls = 0;
        assert!(config.validate().is_err());
        config.max_parallel_polls = 1;

        config.max_poll_failures = Some(0);
        assert!(config.validate().is_err());
        config.max_poll_failures = Some(3);
        assert!(config.validate().is_ok());
    }
}
