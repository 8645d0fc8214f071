//! Windows over a time series and base-window resolution

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A contiguous run of points, `[start, start + length)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    start: usize,
    length: usize,
}

impl Window {
    /// Create a window, rejecting zero length
    pub fn new(start: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window length must be positive".to_string(),
            ));
        }
        start.checked_add(length).ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "Window [{}, +{}) overflows the index space",
                start, length
            ))
        })?;

        Ok(Self { start, length })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.length
    }

    /// Always false; zero-length windows cannot be built
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// One past the last index
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The window's values, checking it fits inside `values`
    pub fn slice<'a>(&self, values: &'a [f64]) -> Result<&'a [f64]> {
        values.get(self.range()).ok_or(ForecastError::InsufficientHistory {
            required: self.end(),
            available: values.len(),
        })
    }
}

/// How the base (query) window is chosen from the end of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseWindowSpec {
    /// Every point within this many calendar days of the reference instant,
    /// both ends inclusive. Trading calendars have gaps, so the point count
    /// varies with the data.
    CalendarDays(u32),
    /// Points with `start <= t < end`
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// The last `n` points
    Trailing(usize),
}

impl Default for BaseWindowSpec {
    fn default() -> Self {
        BaseWindowSpec::CalendarDays(crate::config::DEFAULT_BASE_LOOKBACK_DAYS)
    }
}

impl BaseWindowSpec {
    /// Resolve to concrete indices.
    ///
    /// For `CalendarDays` the reference instant is `as_of` when given,
    /// otherwise the series' last timestamp.
    pub fn resolve(&self, series: &TimeSeries, as_of: Option<DateTime<Utc>>) -> Result<Window> {
        let last = series.last_timestamp().ok_or(ForecastError::EmptySeries)?;

        let (start, end) = match self {
            BaseWindowSpec::CalendarDays(days) => {
                let reference = as_of.unwrap_or(last);
                // A span reaching past the representable range covers everything
                let first = reference
                    .checked_sub_signed(Duration::days(i64::from(*days)))
                    .map_or(0, |from| series.lower_bound(from));
                (first, series.upper_bound(reference))
            }
            BaseWindowSpec::Range { start, end } => {
                if start >= end {
                    return Err(ForecastError::InvalidParameter(format!(
                        "Base range start {} must precede end {}",
                        start, end
                    )));
                }
                (series.lower_bound(*start), series.lower_bound(*end))
            }
            BaseWindowSpec::Trailing(count) => {
                if *count > series.len() {
                    return Err(ForecastError::InsufficientHistory {
                        required: *count,
                        available: series.len(),
                    });
                }
                (series.len() - count, series.len())
            }
        };

        if end <= start {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                available: 0,
            });
        }

        Window::new(start, end - start)
    }
}
