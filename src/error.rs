//! Error types for BetterMe Pulse
//!
//! Parsing, coercion and scoring never fail. Errors only come from the edges:
//! fetching the export, reading configuration and encoding reports.

use crate::config::ConfigError;
use crate::source::FetchError;
use thiserror::Error;

/// Errors surfaced to callers of the pipeline edges
#[derive(Debug, Error)]
pub enum PulseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV encoding error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl PulseError {
    /// True when the export could not be fetched before the deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, PulseError::Fetch(FetchError::Timeout { .. }))
    }
}
