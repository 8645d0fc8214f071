//! Exhaustive scan of historical candidate windows

use crate::error::{ForecastError, Result};
use pattern_math::{normalize, score, MathError, NormalizedWindow, RollingExtrema};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// A scored candidate window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Start index of the candidate in the series
    pub start: usize,
    /// Cosine similarity against the base window
    pub score: f64,
}

/// How candidate offsets are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// One pass with running min/max
    #[default]
    Sequential,
    /// Offsets sharded across the rayon pool
    Parallel,
}

/// Scores of every non-degenerate candidate, in ascending start order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanOutcome {
    pub matches: Vec<Match>,
    /// Number of candidate offsets visited
    pub searched: usize,
    /// Candidates skipped because their values were flat
    pub degenerate: usize,
}

/// Enumerates and scores candidate windows of a fixed length
#[derive(Debug, Clone)]
pub struct WindowScanner {
    base_length: usize,
    horizon: usize,
    strategy: ScanStrategy,
}

impl WindowScanner {
    /// Create a scanner for windows of `base_length` points that need
    /// `horizon` further points after them
    pub fn new(base_length: usize, horizon: usize) -> Result<Self> {
        if base_length == 0 {
            return Err(ForecastError::InvalidParameter(
                "Base window length must be positive".to_string(),
            ));
        }
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be positive".to_string(),
            ));
        }

        Ok(Self {
            base_length,
            horizon,
            strategy: ScanStrategy::default(),
        })
    }

    /// Set the scan strategy
    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn base_length(&self) -> usize {
        self.base_length
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn strategy(&self) -> ScanStrategy {
        self.strategy
    }

    /// Candidate start indices for a series of `series_len` points:
    /// `0 ..= series_len - base_length - horizon - 1`.
    ///
    /// Every candidate keeps `base_length + horizon` points inside the data
    /// and starts before the trailing base window.
    pub fn candidate_range(&self, series_len: usize) -> Result<Range<usize>> {
        let required = self.base_length + self.horizon + 1;
        if series_len < required {
            return Err(ForecastError::InsufficientHistory {
                required,
                available: series_len,
            });
        }

        Ok(0..series_len - self.base_length - self.horizon)
    }

    /// Score every candidate in `values` against `base`
    pub fn scan(&self, values: &[f64], base: &NormalizedWindow) -> Result<ScanOutcome> {
        if base.len() != self.base_length {
            return Err(MathError::LengthMismatch {
                left: base.len(),
                right: self.base_length,
            }
            .into());
        }

        let candidates = self.candidate_range(values.len())?;
        let outcome = match self.strategy {
            ScanStrategy::Sequential => self.scan_sequential(values, candidates, base)?,
            ScanStrategy::Parallel => self.scan_parallel(values, candidates, base)?,
        };

        debug!(
            strategy = ?self.strategy,
            searched = outcome.searched,
            scored = outcome.matches.len(),
            degenerate = outcome.degenerate,
            "scanned candidate windows"
        );

        Ok(outcome)
    }

    fn scan_sequential(
        &self,
        values: &[f64],
        candidates: Range<usize>,
        base: &NormalizedWindow,
    ) -> Result<ScanOutcome> {
        let width = self.base_length;
        let mut extrema = RollingExtrema::new(width)?;
        let mut outcome = ScanOutcome {
            matches: Vec::with_capacity(candidates.len()),
            searched: candidates.len(),
            degenerate: 0,
        };

        // Only points covered by some candidate window are pushed
        let covered = &values[..candidates.end - 1 + width];
        for (pos, &value) in covered.iter().enumerate() {
            extrema.update(value)?;
            let Some((min, max)) = extrema.bounds() else {
                continue;
            };

            let start = pos + 1 - width;
            match score_candidate(&covered[start..=pos], min, max, base)? {
                Some(score) => outcome.matches.push(Match { start, score }),
                None => outcome.degenerate += 1,
            }
        }

        Ok(outcome)
    }

    fn scan_parallel(
        &self,
        values: &[f64],
        candidates: Range<usize>,
        base: &NormalizedWindow,
    ) -> Result<ScanOutcome> {
        let width = self.base_length;
        let searched = candidates.len();

        // Indexed collect keeps ascending start order whatever the pool does
        let scored: Vec<Option<Match>> = candidates
            .into_par_iter()
            .map(|start| {
                let window = &values[start..start + width];
                let normalized = match normalize(window) {
                    Ok(normalized) => normalized,
                    Err(MathError::DegenerateWindow { .. }) => return Ok(None),
                    Err(e) => return Err(ForecastError::from(e)),
                };
                Ok(Some(Match {
                    start,
                    score: score(base, &normalized)?,
                }))
            })
            .collect::<Result<_>>()?;

        let degenerate = scored.iter().filter(|m| m.is_none()).count();
        let matches = scored.into_iter().flatten().collect();

        Ok(ScanOutcome {
            matches,
            searched,
            degenerate,
        })
    }
}

/// Normalize a candidate with known extrema and score it; `None` if flat
fn score_candidate(
    window: &[f64],
    min: f64,
    max: f64,
    base: &NormalizedWindow,
) -> Result<Option<f64>> {
    match NormalizedWindow::with_bounds(window, min, max) {
        Ok(candidate) => Ok(Some(score(base, &candidate)?)),
        Err(MathError::DegenerateWindow { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
