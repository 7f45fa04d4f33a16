//! Configuration management for investboard
//!
//! This module handles loading, validation, and management of
//! investboard configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorCode, ConfigResult};

// ==================== Configuration Types ====================

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the transaction store
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Transaction store file name (JSON array)
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            transactions_file: default_transactions_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_transactions_file() -> String {
    "transactions.json".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Transactions per page in the statement list
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

/// Chart and visualization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Number of entries kept in ranked charts
    #[serde(default = "default_top_items")]
    pub top_items_count: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_items_count: default_top_items(),
        }
    }
}

fn default_top_items() -> usize {
    10
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// ISO currency code
    #[serde(default = "default_currency_code")]
    pub code: String,
    /// Symbol printed before amounts
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

fn default_currency_code() -> String {
    "BRL".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ".".to_string()
}

fn default_decimal_sep() -> String {
    ",".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Chart settings
    #[serde(default)]
    pub charts: ChartConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound { path }) => {
                log::info!(target: "investboard::config", "No config at {}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pagination.page_size == 0 {
            return Err(ConfigError::invalid(
                "pagination.page_size",
                "Page size must be at least 1",
            ));
        }

        if self.charts.top_items_count == 0 {
            return Err(ConfigError::invalid(
                "charts.top_items_count",
                "Top items count must be at least 1",
            ));
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::invalid(
                "currency.decimal_places",
                "Decimal places must be between 0 and 10",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                "Log level must be one of error, warn, info, debug, trace",
            ));
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the transaction store
    pub fn transactions_path(&self) -> PathBuf {
        self.data.path.join(&self.data.transactions_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.charts.top_items_count, 10);
        assert_eq!(config.currency.code, "BRL");
        assert_eq!(config.currency.decimal_separator, ",");
        assert_eq!(config.transactions_path(), PathBuf::from("./data/transactions.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.currency.symbol, "R$");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("pagination:\n  page_size: 25\n").unwrap();
        assert_eq!(config.pagination.page_size, 25);
        assert_eq!(config.charts.top_items_count, 10);
        assert_eq!(config.data.transactions_file, "transactions.json");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::from_yaml("pagination:\n  page_size: 0\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "pagination.page_size"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("pagination: [1, 2").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  path: /tmp/invest\ncharts:\n  top_items_count: 3").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.charts.top_items_count, 3);
        assert_eq!(config.transactions_path(), PathBuf::from("/tmp/invest/transactions.json"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        assert_eq!(Config::load(&path).unwrap_err().code(), ConfigErrorCode::FileNotFound);
        assert_eq!(Config::load_or_default(&path).unwrap().pagination.page_size, 10);
    }
}
