//! Configuration for a fitpage client session
//!
//! All constants the core recognizes live here: the page-size ceiling,
//! the two usage window limits and the warning threshold. Every field has a
//! serde default so a partial (or empty) YAML document is a valid config.

use crate::error::{Error, Result};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Ceiling the remote service applies to every page
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 200;

/// Requests allowed per short (15 minute) window
pub const DEFAULT_SHORT_WINDOW_LIMIT: u64 = 600;

/// Requests allowed per day
pub const DEFAULT_DAILY_LIMIT: u64 = 30_000;

/// Percent used at which a window is classified as a warning
pub const DEFAULT_WARN_THRESHOLD_PERCENT: f64 = 90.0;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Paging settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Usage window settings
    #[serde(default)]
    pub usage: UsageConfig,

    /// HTTP fetcher settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Parse a config from a YAML string and validate it
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Serialize the effective config back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every section for values the core cannot work with
    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()?;
        self.usage.validate()?;
        self.http.validate()
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Paging settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Largest page size ever requested; larger requests are lowered to this
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    /// Create a pagination config with the given ceiling
    pub fn new(max_page_size: u32) -> Self {
        Self { max_page_size }
    }

    fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            return Err(Error::invalid_config(
                "pagination.max_page_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

// ============================================================================
// Usage Windows
// ============================================================================

/// Usage window limits and roll-over cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Ceiling of the short window
    #[serde(default = "default_short_window_limit")]
    pub short_window_limit: u64,

    /// Ceiling of the daily window
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u64,

    /// Percent used at which classification becomes a warning
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold_percent: f64,

    /// Length of the short window in seconds
    #[serde(default = "default_short_window_secs")]
    pub short_window_secs: u64,

    /// Length of the daily window in seconds
    #[serde(default = "default_daily_window_secs")]
    pub daily_window_secs: u64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            short_window_limit: default_short_window_limit(),
            daily_limit: default_daily_limit(),
            warn_threshold_percent: default_warn_threshold(),
            short_window_secs: default_short_window_secs(),
            daily_window_secs: default_daily_window_secs(),
        }
    }
}

impl UsageConfig {
    /// Short window period as a duration
    pub fn short_window(&self) -> Duration {
        Duration::from_secs(self.short_window_secs)
    }

    /// Daily window period as a duration
    pub fn daily_window(&self) -> Duration {
        Duration::from_secs(self.daily_window_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(self.warn_threshold_percent > 0.0 && self.warn_threshold_percent <= 100.0) {
            return Err(Error::invalid_config(
                "usage.warn_threshold_percent",
                format!(
                    "must be in (0, 100], got {}",
                    self.warn_threshold_percent
                ),
            ));
        }
        if self.short_window_secs == 0 {
            return Err(Error::invalid_config(
                "usage.short_window_secs",
                "must be greater than 0",
            ));
        }
        if self.daily_window_secs == 0 {
            return Err(Error::invalid_config(
                "usage.daily_window_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn default_short_window_limit() -> u64 {
    DEFAULT_SHORT_WINDOW_LIMIT
}

fn default_daily_limit() -> u64 {
    DEFAULT_DAILY_LIMIT
}

fn default_warn_threshold() -> f64 {
    DEFAULT_WARN_THRESHOLD_PERCENT
}

fn default_short_window_secs() -> u64 {
    15 * 60
}

fn default_daily_window_secs() -> u64 {
    24 * 60 * 60
}

// ============================================================================
// HTTP
// ============================================================================

/// Settings for the bundled HTTP page fetcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL for all requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retries for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Optional local pacing (requests per second); unset means no pacing
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            requests_per_second: None,
        }
    }
}

impl HttpConfig {
    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_config("http.base_url", e.to_string()))?;
        if self.timeout_secs == 0 {
            return Err(Error::invalid_config(
                "http.timeout_secs",
                "must be greater than 0",
            ));
        }
        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_config(
                "http.requests_per_second",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://www.strava.com/api/v3".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pagination.max_page_size, 200);
        assert_eq!(config.usage.short_window_limit, 600);
        assert_eq!(config.usage.daily_limit, 30_000);
        assert_eq!(config.usage.short_window(), Duration::from_secs(900));
        assert_eq!(config.usage.daily_window(), Duration::from_secs(86_400));
        assert!(config.http.requests_per_second.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
pagination:
  max_page_size: 50
usage:
  short_window_limit: 100
  warn_threshold_percent: 75
http:
  base_url: "https://api.example.com"
  backoff: linear
  requests_per_second: 5
"#;

        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.pagination.max_page_size, 50);
        assert_eq!(config.usage.short_window_limit, 100);
        assert_eq!(config.usage.daily_limit, DEFAULT_DAILY_LIMIT);
        assert!((config.usage.warn_threshold_percent - 75.0).abs() < f64::EPSILON);
        assert_eq!(config.http.base_url, "https://api.example.com");
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert_eq!(config.http.requests_per_second, Some(5));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::from_yaml_str("pagination:\n  max_page_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("pagination.max_page_size"));
    }

    #[test]
    fn test_warn_threshold_out_of_range() {
        let err = Config::from_yaml_str("usage:\n  warn_threshold_percent: 120\n").unwrap_err();
        assert!(err.to_string().contains("warn_threshold_percent"));

        let err = Config::from_yaml_str("usage:\n  warn_threshold_percent: 0\n").unwrap_err();
        assert!(err.to_string().contains("warn_threshold_percent"));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let err = Config::from_yaml_str("http:\n  base_url: \"not a url\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.usage.daily_limit = 1_000;
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
