//! Runtime configuration
//!
//! Defaults match the deployed dashboard. Every value can be overridden from the
//! environment; the CLI loads a `.env` file first and applies flags last.

use crate::trends::{DEFAULT_ROLLING_WINDOW, DEFAULT_WARNING_WINDOW};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Default number of rows in the recent-days table
pub const DEFAULT_TABLE_ROWS: usize = 7;

/// Top-level configuration for a dashboard run
#[derive(Debug, Clone, PartialEq)]
pub struct PulseConfig {
    /// Location of the export: a file path, `-` for stdin, or an http(s) URL
    pub source: Option<String>,
    pub fetch_timeout: Duration,
    pub rolling_window: usize,
    pub warning_window: usize,
    pub table_rows: usize,
    pub log_level: String,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            source: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            rolling_window: DEFAULT_ROLLING_WINDOW,
            warning_window: DEFAULT_WARNING_WINDOW,
            table_rows: DEFAULT_TABLE_ROWS,
            log_level: "info".to_string(),
        }
    }
}

impl PulseConfig {
    /// Build a configuration from `PULSE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let source = env::var("PULSE_SOURCE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let fetch_timeout = match read_positive("PULSE_FETCH_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs as u64),
            None => defaults.fetch_timeout,
        };

        Ok(Self {
            source,
            fetch_timeout,
            rolling_window: read_positive("PULSE_ROLLING_WINDOW")?
                .unwrap_or(defaults.rolling_window),
            warning_window: read_positive("PULSE_WARNING_WINDOW")?
                .unwrap_or(defaults.warning_window),
            table_rows: read_positive("PULSE_TABLE_ROWS")?.unwrap_or(defaults.table_rows),
            log_level: env::var("PULSE_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}

fn read_positive(name: &'static str) -> Result<Option<usize>, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}
