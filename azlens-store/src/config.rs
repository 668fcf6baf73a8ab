//! Configuration management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use azlens_fetch::RateLimitConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Rate limiting settings.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Timeout for each az invocation, in seconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    /// Whether directory objects (apps, users, groups, role assignments)
    /// are fetched alongside cloud resources.
    #[serde(default = "default_true")]
    pub include_directory_objects: bool,
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Whether expired cost entries are swept on each cost lookup.
    #[serde(default = "default_true")]
    pub sweep_cost_entries: bool,
}

/// Rate limiting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Whether rate limiting is applied at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum requests within one minute.
    #[serde(default = "default_max_per_minute")]
    pub max_requests_per_minute: u32,
    /// Minimum spacing between consecutive requests, in milliseconds.
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
}

fn default_command_timeout() -> u64 {
    30
}

fn default_ttl() -> u64 {
    300
}

fn default_max_per_minute() -> u32 {
    30
}

fn default_min_interval() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout(),
            include_directory_objects: true,
            log_level: default_log_level(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            sweep_cost_entries: true,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests_per_minute: default_max_per_minute(),
            min_interval_ms: default_min_interval(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("azlens")
            .join("config.json")
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Cache entry lifetime as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Command timeout as a duration.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.general.command_timeout_secs)
    }

    /// The limiter settings in the form the fetch layer consumes.
    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            enabled: self.rate_limit.enabled,
            max_requests_per_minute: self.rate_limit.max_requests_per_minute,
            min_interval: Duration::from_millis(self.rate_limit.min_interval_ms),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.general.command_timeout_secs, 30);
        assert!(config.general.include_directory_objects);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("azlens").join("config.json");

        let mut config = Config::default();
        config.cache.ttl_secs = 60;
        config.rate_limit.enabled = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cache.ttl_secs, 60);
        assert!(!loaded.rate_limit.enabled);
        assert!(!loaded.rate_limit_config().enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"cache":{"ttl_secs":120}}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cache.ttl_secs, 120);
        assert!(loaded.cache.sweep_cost_entries);
        assert_eq!(loaded.general.command_timeout_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
