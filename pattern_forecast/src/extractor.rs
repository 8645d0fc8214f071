//! Extending a match by the horizon

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::window::Window;
use pattern_math::normalize;

/// Takes a matched window plus its continuation and rescales the combined
/// span as one unit.
///
/// This is a separate pass from the candidate normalization: the combined
/// min/max let the continuation rise above or fall below the matched
/// window's own range.
#[derive(Debug, Clone, Copy)]
pub struct ForecastExtractor {
    base_length: usize,
    horizon: usize,
}

impl ForecastExtractor {
    /// Create a new extractor
    pub fn new(base_length: usize, horizon: usize) -> Result<Self> {
        if base_length == 0 || horizon == 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Base length ({}) and horizon ({}) must be positive",
                base_length, horizon
            )));
        }

        Ok(Self {
            base_length,
            horizon,
        })
    }

    /// The matched window extended by the horizon
    pub fn span(&self, match_start: usize) -> Result<Window> {
        Window::new(match_start, self.base_length + self.horizon)
    }

    /// Normalized values of the extended span
    pub fn extract(&self, values: &[f64], match_start: usize) -> Result<Vec<f64>> {
        let span = self.span(match_start)?;
        let extended = span.slice(values)?;
        Ok(normalize(extended)?.into_values())
    }

    /// Date labels of the extended span
    pub fn extract_labels(&self, series: &TimeSeries, match_start: usize) -> Result<Vec<String>> {
        series.labels(self.span(match_start)?.range())
    }
}
