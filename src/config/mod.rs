//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::analytics::compare::ComparisonThresholds;
use crate::analytics::heatmap::HeatmapConfig;
use crate::analytics::trend::TrendThresholds;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied to stored analysis payloads, in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

fn default_ttl_seconds() -> u64 {
    300
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

/// Main application configuration.
///
/// Threshold and canvas settings are explicit sub-structs handed to the
/// analytics components, never read from process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Region used when a request does not specify one.
    #[serde(default = "default_region")]
    pub default_region: String,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub trend: TrendThresholds,

    #[serde(default)]
    pub comparison: ComparisonThresholds,

    #[serde(default)]
    pub heatmap: HeatmapConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_region() -> String {
    "euw".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_region: default_region(),
            cache: CacheConfig::default(),
            trend: TrendThresholds::default(),
            comparison: ComparisonThresholds::default(),
            heatmap: HeatmapConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Cache TTL must be greater than 0".to_string(),
            ));
        }

        if self.heatmap.canvas_size == 0 {
            return Err(ConfigError::ValidationError(
                "Heatmap canvas size must be greater than 0".to_string(),
            ));
        }

        if !(self.trend.direction > 0.0
            && self.trend.direction < self.trend.moderate
            && self.trend.moderate < self.trend.major)
        {
            return Err(ConfigError::ValidationError(
                "Trend thresholds must satisfy 0 < direction < moderate < major".to_string(),
            ));
        }

        if !(self.comparison.tie > 0.0
            && self.comparison.tie < self.comparison.moderate
            && self.comparison.moderate < self.comparison.major)
        {
            return Err(ConfigError::ValidationError(
                "Comparison thresholds must satisfy 0 < tie < moderate < major".to_string(),
            ));
        }

        Ok(())
    }
}
