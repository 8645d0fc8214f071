//! Min-max normalization of price windows
//!
//! A window is rescaled by its own minimum and maximum, so two windows from
//! different price eras compare by shape alone.

use crate::{MathError, Result};
use serde::Serialize;
use statrs::statistics::Statistics;

/// A window rescaled onto [0, 1] by its own extrema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedWindow {
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl NormalizedWindow {
    /// Normalize `values` using extrema the caller has already computed.
    ///
    /// The scanner tracks min/max incrementally and hands them in here. The
    /// bounds must be the true extrema of `values`; only degeneracy and
    /// finiteness are re-checked.
    pub fn with_bounds(values: &[f64], min: f64, max: f64) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InvalidInput(
                "Window must contain at least one value".to_string(),
            ));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Window bounds must be finite (min={}, max={})",
                min, max
            )));
        }
        if max < min {
            return Err(MathError::InvalidInput(format!(
                "Window max ({}) is below min ({})",
                max, min
            )));
        }
        if max == min {
            return Err(MathError::DegenerateWindow { value: min });
        }

        let range = max - min;
        let values = values.iter().map(|v| (v - min) / range).collect();

        Ok(Self { values, min, max })
    }

    /// The normalized values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Minimum of the source window
    pub fn source_min(&self) -> f64 {
        self.min
    }

    /// Maximum of the source window
    pub fn source_max(&self) -> f64 {
        self.max
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Rescale a window to [0, 1] via `(v - min) / (max - min)`.
///
/// Fails with [`MathError::DegenerateWindow`] when the window is flat, and
/// with [`MathError::InvalidInput`] when it is empty or holds a non-finite
/// value.
pub fn normalize(values: &[f64]) -> Result<NormalizedWindow> {
    if values.is_empty() {
        return Err(MathError::InvalidInput(
            "Window must contain at least one value".to_string(),
        ));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Window contains a non-finite value: {}",
            bad
        )));
    }

    let min = Statistics::min(values);
    let max = Statistics::max(values);

    NormalizedWindow::with_bounds(values, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_maps_onto_unit_range() {
        let window = normalize(&[10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();

        assert_eq!(window.values(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(window.source_min(), 10.0);
        assert_eq!(window.source_max(), 50.0);
    }

    #[test]
    fn test_normalize_ignores_price_level() {
        let low = normalize(&[1.0, 3.0, 2.0, 5.0]).unwrap();
        let high = normalize(&[1001.0, 1003.0, 1002.0, 1005.0]).unwrap();

        for (a, b) in low.values().iter().zip(high.values()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_normalize_extremes_are_zero_and_one() {
        let window = normalize(&[7.5, 3.2, 9.9, 4.4, 8.1, 3.2]).unwrap();
        let min = window.values().iter().cloned().fold(f64::INFINITY, f64::min);
        let max = window
            .values()
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_flat_window_is_degenerate() {
        let result = normalize(&[5.0, 5.0, 5.0, 5.0, 5.0]);
        assert_eq!(result, Err(MathError::DegenerateWindow { value: 5.0 }));

        // A single point has no range either
        assert!(matches!(
            normalize(&[3.0]),
            Err(MathError::DegenerateWindow { .. })
        ));
    }

    #[test]
    fn test_invalid_windows() {
        assert!(matches!(normalize(&[]), Err(MathError::InvalidInput(_))));
        assert!(matches!(
            normalize(&[1.0, f64::NAN, 2.0]),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            NormalizedWindow::with_bounds(&[1.0, 2.0], 2.0, 1.0),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_with_bounds_matches_normalize() {
        let values = [4.0, 8.0, 6.0, 2.0];
        let direct = normalize(&values).unwrap();
        let bounded = NormalizedWindow::with_bounds(&values, 2.0, 8.0).unwrap();

        assert_eq!(direct, bounded);
    }
}
