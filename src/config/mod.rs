//! Configuration management for the parinaam scraper
//!
//! This module handles loading and validating configuration from defaults,
//! environment variables, and optional TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default portal base URL; overridable for tests and mirrors
pub const DEFAULT_BASE_URL: &str = "http://results.nith.ac.in";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fetch client configuration
    pub fetch: FetchConfig,

    /// Inter-request pacing configuration
    pub pacing: PacingConfig,

    /// Output artifact configuration
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Fetch client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Portal base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum transport-level retry attempts for 5xx responses
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: u64,

    /// Rate limit (requests per second)
    pub requests_per_second: u32,
}

/// Pacing delays between consecutive fetches in a batch
///
/// Single-department batches use a randomized 1-3 s delay; year-wide and
/// all-years sweeps stretch it to 2-5 s. A min equal to max gives a fixed
/// delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum delay in milliseconds between fetches in a department batch
    pub batch_min_ms: u64,

    /// Maximum delay in milliseconds between fetches in a department batch
    pub batch_max_ms: u64,

    /// Minimum delay in milliseconds for year-wide and all-years sweeps
    pub sweep_min_ms: u64,

    /// Maximum delay in milliseconds for year-wide and all-years sweeps
    pub sweep_max_ms: u64,
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory JSON/CSV artifacts are written to
    pub dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("PARINAAM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = std::env::var("PARINAAM_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(15);

        let max_retries = std::env::var("PARINAAM_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let base_delay_ms = std::env::var("PARINAAM_BASE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(500);

        let requests_per_second = std::env::var("PARINAAM_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let output_dir = std::env::var("PARINAAM_OUTPUT_DIR")
            .unwrap_or_else(|_| String::from("."))
            .into();

        let log_level =
            std::env::var("PARINAAM_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("PARINAAM_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            fetch: FetchConfig {
                base_url,
                request_timeout_secs,
                max_retries,
                base_delay_ms,
                requests_per_second,
            },
            pacing: PacingConfig::default(),
            output: OutputConfig { dir: output_dir },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.fetch.base_url.is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        if self.fetch.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.pacing.batch_min_ms > self.pacing.batch_max_ms {
            anyhow::bail!("batch pacing range is inverted");
        }

        if self.pacing.sweep_min_ms > self.pacing.sweep_max_ms {
            anyhow::bail!("sweep pacing range is inverted");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                request_timeout_secs: 15,
                max_retries: 5,
                base_delay_ms: 500,
                requests_per_second: 1,
            },
            pacing: PacingConfig::default(),
            output: OutputConfig {
                dir: PathBuf::from("."),
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_min_ms: 1000,
            batch_max_ms: 3000,
            sweep_min_ms: 2000,
            sweep_max_ms: 5000,
        }
    }
}

impl PacingConfig {
    /// Pacing disabled entirely, for tests
    #[must_use]
    pub fn none() -> Self {
        Self {
            batch_min_ms: 0,
            batch_max_ms: 0,
            sweep_min_ms: 0,
            sweep_max_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut config = Config::default();
        config.fetch.requests_per_second = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_pacing_range_rejected() {
        let mut config = Config::default();
        config.pacing.batch_min_ms = 5000;
        config.pacing.batch_max_ms = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_from_toml_file() {
        let toml = r#"
            [fetch]
            base_url = "http://localhost:9999"
            request_timeout_secs = 5
            max_retries = 2
            base_delay_ms = 100
            requests_per_second = 10

            [pacing]
            batch_min_ms = 0
            batch_max_ms = 0
            sweep_min_ms = 0
            sweep_max_ms = 0

            [output]
            dir = "out"

            [logging]
            level = "debug"
            format = "json"
        "#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parinaam.toml");
        std::fs::write(&path, toml).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.fetch.base_url, "http://localhost:9999");
        assert_eq!(config.fetch.max_retries, 2);
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }
}
