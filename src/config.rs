//! Configuration management for `TravelCard`
//!
//! Handles loading configuration from an optional TOML file and
//! `TRAVELCARD_*` environment variables, and validates the result.

use crate::TravelCardError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelCardConfig {
    /// Upstream API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Search-as-you-type settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Card export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Open-Meteo endpoints and transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Geocoding search endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Daily forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Request timeout in seconds. `None` keeps the transport default.
    #[serde(default)]
    pub timeout_seconds: Option<u32>,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Search-as-you-type settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiescence window before a query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Queries shorter than this never reach the network
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    /// Maximum number of candidates requested
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Language for place names
    #[serde(default = "default_language")]
    pub language: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Card export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory PNG cards are written to when no path is given
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_user_agent() -> String {
    format!("TravelCard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_chars() -> usize {
    2
}

fn default_max_results() -> u32 {
    5
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            max_results: default_max_results(),
            language: default_language(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl TravelCardConfig {
    /// Load configuration from the given path, or the default location when
    /// `None`, with environment overrides applied on top
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("travelcard.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVELCARD_SEARCH__DEBOUNCE_MS=500 -> search.debounce_ms
        builder = builder.add_source(
            Environment::with_prefix("TRAVELCARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelCardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelcard").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.geocoding_url.is_empty() {
            self.api.geocoding_url = default_geocoding_url();
        }
        if self.api.forecast_url.is_empty() {
            self.api.forecast_url = default_forecast_url();
        }
        if self.api.user_agent.is_empty() {
            self.api.user_agent = default_user_agent();
        }
        if self.search.min_query_chars == 0 {
            self.search.min_query_chars = default_min_query_chars();
        }
        if self.search.max_results == 0 {
            self.search.max_results = default_max_results();
        }
        if self.search.language.is_empty() {
            self.search.language = default_language();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.export.output_dir.is_empty() {
            self.export.output_dir = default_output_dir();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if let Some(timeout) = self.api.timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(TravelCardError::config(
                    "API timeout must be between 1 and 300 seconds",
                )
                .into());
            }
        }

        if self.search.debounce_ms > 5000 {
            return Err(
                TravelCardError::config("Search debounce cannot exceed 5000 ms").into(),
            );
        }

        // Open-Meteo caps `count` at 100
        if self.search.max_results > 100 {
            return Err(TravelCardError::config("Search max results cannot exceed 100").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelCardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelCardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.api.geocoding_url),
            ("Forecast", &self.api.forecast_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelCardError::config(format!(
                    "{name} API URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TravelCardConfig::default();
        assert_eq!(
            config.api.geocoding_url,
            "https://geocoding-api.open-meteo.com/v1/search"
        );
        assert_eq!(config.api.forecast_url, "https://api.open-meteo.com/v1/forecast");
        assert!(config.api.timeout_seconds.is_none());
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.min_query_chars, 2);
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.language, "en");
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debounce_duration() {
        let config = TravelCardConfig::default();
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TravelCardConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TravelCardConfig::default();
        config.api.timeout_seconds = Some(500);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));

        let mut config = TravelCardConfig::default();
        config.search.max_results = 250;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = TravelCardConfig::default();
        config.api.forecast_url = "ftp://example.com/forecast".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Forecast API URL"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_fields() {
        let mut config = TravelCardConfig::default();
        config.api.geocoding_url.clear();
        config.search.max_results = 0;
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(
            config.api.geocoding_url,
            "https://geocoding-api.open-meteo.com/v1/search"
        );
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nforecast_url = \"http://localhost:9000/v1/forecast\"\n\n[search]\ndebounce_ms = 150"
        )
        .unwrap();

        let config = TravelCardConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.forecast_url, "http://localhost:9000/v1/forecast");
        assert_eq!(config.search.debounce_ms, 150);
        // untouched sections keep their defaults
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.export.output_dir, ".");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TravelCardConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travelcard"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
