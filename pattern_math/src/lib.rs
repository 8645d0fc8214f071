//! # Pattern Math
//!
//! Numeric building blocks for comparing the shape of price windows.
//! This crate provides min-max normalization, cosine similarity and a
//! rolling min/max tracker used to scan long series without recomputing
//! each window's extrema from scratch.

use thiserror::Error;

pub mod normalize;
pub mod rolling;
pub mod similarity;

pub use normalize::{normalize, NormalizedWindow};
pub use rolling::RollingExtrema;
pub use similarity::{cosine_similarity, score};

/// Errors that can occur in window calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    /// Every value in the window is the same, so min-max scaling is undefined
    #[error("Degenerate window: all values equal {value}")]
    DegenerateWindow { value: f64 },

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Zero-norm vector cannot be compared")]
    ZeroVector,
}

/// Result type for window math operations
pub type Result<T> = std::result::Result<T, MathError>;
