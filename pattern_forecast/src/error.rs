//! Error types for the pattern_forecast crate

use pattern_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the pattern_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The input series has no points
    #[error("Time series is empty")]
    EmptySeries,

    /// Not enough points for the base window or for any candidate window
    #[error("Insufficient history: need at least {required} points, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// The base window is flat, so its shape cannot be normalized
    #[error("Degenerate base window at index {start} (length {length}): all values equal")]
    DegenerateWindow { start: usize, length: usize },

    /// Every candidate was flat, or there were none to score
    #[error("No valid candidate windows ({searched} searched, {degenerate} degenerate)")]
    NoValidCandidates { searched: usize, degenerate: usize },

    /// Error from window math; scorer invariant violations land here
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from configuration loading
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from parsing numbers or dates
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for ForecastError {
    fn from(err: std::num::ParseIntError) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}

impl From<chrono::ParseError> for ForecastError {
    fn from(err: chrono::ParseError) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}

impl ForecastError {
    /// True for conditions caused by the input data rather than by a defect,
    /// i.e. ones worth showing to an end user.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ForecastError::EmptySeries
                | ForecastError::InsufficientHistory { .. }
                | ForecastError::DegenerateWindow { .. }
                | ForecastError::NoValidCandidates { .. }
                | ForecastError::InvalidParameter(_)
        )
    }

    /// Short message suitable for a status bar or dialog
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::EmptySeries => "No price data is available for this symbol.".to_string(),
            ForecastError::InsufficientHistory { .. } => {
                "Not enough history to forecast. Try a shorter horizon.".to_string()
            }
            ForecastError::DegenerateWindow { .. } => {
                "Recent prices are flat, so there is no pattern to match.".to_string()
            }
            ForecastError::NoValidCandidates { .. } => {
                "No comparable historical pattern was found.".to_string()
            }
            ForecastError::InvalidParameter(msg) => format!("Invalid setting: {}", msg),
            other => format!("Forecast failed: {}", other),
        }
    }
}
