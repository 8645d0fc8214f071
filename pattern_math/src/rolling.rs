//! Rolling minimum and maximum over a fixed-size window
//!
//! Each extremum is kept in a monotonic deque of `(position, value)` pairs,
//! so sliding the window by one point costs amortized O(1) instead of a
//! rescan of the whole window.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Sliding-window min/max tracker
#[derive(Debug, Clone)]
pub struct RollingExtrema {
    period: usize,
    seen: usize,
    // Front holds the current minimum; values increase towards the back
    minima: VecDeque<(usize, f64)>,
    // Front holds the current maximum; values decrease towards the back
    maxima: VecDeque<(usize, f64)>,
}

impl RollingExtrema {
    /// Create a new tracker over windows of `period` points
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            seen: 0,
            minima: VecDeque::with_capacity(period),
            maxima: VecDeque::with_capacity(period),
        })
    }

    /// Push the next value, evicting the one that falls out of the window
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Value must be finite, got {}",
                value
            )));
        }

        let position = self.seen;
        self.seen += 1;

        while matches!(self.minima.back(), Some(&(_, v)) if v >= value) {
            self.minima.pop_back();
        }
        self.minima.push_back((position, value));

        while matches!(self.maxima.back(), Some(&(_, v)) if v <= value) {
            self.maxima.pop_back();
        }
        self.maxima.push_back((position, value));

        // Positions at or before `position - period` have left the window
        if position >= self.period {
            let oldest = position + 1 - self.period;
            while matches!(self.minima.front(), Some(&(p, _)) if p < oldest) {
                self.minima.pop_front();
            }
            while matches!(self.maxima.front(), Some(&(p, _)) if p < oldest) {
                self.maxima.pop_front();
            }
        }

        Ok(())
    }

    /// True once a full window of values has been seen
    pub fn is_ready(&self) -> bool {
        self.seen >= self.period
    }

    /// Minimum of the current window
    pub fn min(&self) -> Result<f64> {
        self.front(&self.minima)
    }

    /// Maximum of the current window
    pub fn max(&self) -> Result<f64> {
        self.front(&self.maxima)
    }

    /// Min and max of the current window, or `None` before it has filled
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match (self.min(), self.max()) {
            (Ok(min), Ok(max)) => Some((min, max)),
            _ => None,
        }
    }

    fn front(&self, deque: &VecDeque<(usize, f64)>) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::InsufficientData(format!(
                "Need {} values, have {}",
                self.period, self.seen
            )));
        }
        deque
            .front()
            .map(|&(_, v)| v)
            .ok_or_else(|| MathError::CalculationError("Rolling window is empty".to_string()))
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the tracker, clearing all values
    pub fn reset(&mut self) {
        self.seen = 0;
        self.minima.clear();
        self.maxima.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_extrema_tracks_window() {
        let mut extrema = RollingExtrema::new(3).unwrap();

        extrema.update(5.0).unwrap();
        extrema.update(1.0).unwrap();
        assert!(!extrema.is_ready());
        assert!(extrema.min().is_err());
        assert_eq!(extrema.bounds(), None);

        extrema.update(3.0).unwrap();
        assert_eq!(extrema.bounds(), Some((1.0, 5.0)));

        // 5.0 leaves the window
        extrema.update(2.0).unwrap();
        assert_eq!(extrema.bounds(), Some((1.0, 3.0)));

        // 1.0 leaves the window
        extrema.update(4.0).unwrap();
        assert_eq!(extrema.bounds(), Some((2.0, 4.0)));
    }

    #[test]
    fn test_rolling_extrema_matches_naive_scan() {
        let values = [
            3.1, 4.1, 5.9, 2.6, 5.3, 5.8, 9.7, 9.3, 2.3, 8.4, 6.2, 6.4, 3.3, 8.3, 2.7, 9.5,
        ];
        let period = 4;
        let mut extrema = RollingExtrema::new(period).unwrap();

        for (i, &v) in values.iter().enumerate() {
            extrema.update(v).unwrap();
            if i + 1 >= period {
                let window = &values[i + 1 - period..=i];
                let min = window.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                assert_eq!(extrema.bounds(), Some((min, max)), "window ending at {}", i);
            }
        }
    }

    #[test]
    fn test_rolling_extrema_flat_run() {
        let mut extrema = RollingExtrema::new(2).unwrap();
        for _ in 0..5 {
            extrema.update(7.0).unwrap();
        }
        assert_eq!(extrema.bounds(), Some((7.0, 7.0)));
    }

    #[test]
    fn test_rolling_extrema_validation_and_reset() {
        assert!(RollingExtrema::new(0).is_err());

        let mut extrema = RollingExtrema::new(2).unwrap();
        assert!(extrema.update(f64::INFINITY).is_err());

        extrema.update(1.0).unwrap();
        extrema.update(2.0).unwrap();
        assert!(extrema.is_ready());

        extrema.reset();
        assert!(!extrema.is_ready());
        assert_eq!(extrema.period(), 2);
    }
}
