//! End-to-end forecast: base window, scan, selection, extension

use crate::config::{validate_horizon, ForecastConfig};
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::extractor::ForecastExtractor;
use crate::scanner::{Match, ScanOutcome, WindowScanner};
use crate::selector::MatchSelector;
use crate::window::{BaseWindowSpec, Window};
use chrono::{DateTime, Utc};
use pattern_math::{normalize, MathError, NormalizedWindow};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Internal stage of a run, used to attribute failures in logs
///
/// `Done` and `Failed` are terminal. A run moves to `Failed` from whichever
/// stage raised the error; the reason travels in the returned `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    ExtractingBase,
    Scanning,
    Selecting,
    Extracting,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::ExtractingBase => "extracting base",
            PipelineStage::Scanning => "scanning",
            PipelineStage::Selecting => "selecting",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Observed base window next to its best historical analog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// `YYYY-MM-DD` labels of the base window
    pub base_dates: Vec<String>,
    /// Base window scaled onto [0, 1]
    pub base_normalized: Vec<f64>,
    /// Matched window plus its continuation, scaled as one span
    pub matched_normalized: Vec<f64>,
    /// Last observed point; everything after it is projected
    pub anchor_index: usize,
    pub horizon: usize,
    /// Start index of the base window in the series
    pub base_start: usize,
    /// Start index of the selected candidate
    pub match_start: usize,
    /// Cosine similarity of the selected candidate
    pub match_score: f64,
    /// Labels of the matched span, continuation included
    pub matched_dates: Vec<String>,
}

impl ForecastResult {
    /// Number of points in the base window
    pub fn base_len(&self) -> usize {
        self.base_normalized.len()
    }

    /// The matched points aligned with the base window
    pub fn observed(&self) -> &[f64] {
        &self.matched_normalized[..self.base_len()]
    }

    /// The continuation past the anchor
    pub fn projected(&self) -> &[f64] {
        &self.matched_normalized[self.base_len()..]
    }

    /// First and last index of the shaded projection region
    pub fn projected_span(&self) -> (usize, usize) {
        (self.anchor_index, self.matched_normalized.len() - 1)
    }

    /// Serialize the result as JSON for the charting layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Runs the pattern-match forecast
///
/// Holds only its configuration; every call recomputes from scratch.
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

/// Output of the base and scan stages, shared by `run` and `rank_matches`
struct Scanned {
    base: Window,
    base_normalized: NormalizedWindow,
    visible_len: usize,
    outcome: ScanOutcome,
}

impl ForecastPipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast with the configured lookback and horizon
    pub fn forecast(&self, series: &TimeSeries) -> Result<ForecastResult> {
        self.run(series, &self.config.base_window(), self.config.horizon)
    }

    /// Forecast `horizon` points past the base window chosen by `spec`
    pub fn run(
        &self,
        series: &TimeSeries,
        spec: &BaseWindowSpec,
        horizon: usize,
    ) -> Result<ForecastResult> {
        self.run_as_of(series, spec, horizon, None)
    }

    /// Like [`run`](Self::run) with an explicit reference instant for
    /// calendar-day base windows. Points after the base window are ignored.
    pub fn run_as_of(
        &self,
        series: &TimeSeries,
        spec: &BaseWindowSpec,
        horizon: usize,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<ForecastResult> {
        let (_, result) = self.staged("forecast", |stage| {
            self.execute(series, spec, horizon, as_of, stage)
        });

        if let Ok(forecast) = &result {
            debug!(
                match_start = forecast.match_start,
                score = forecast.match_score,
                base_len = forecast.base_len(),
                horizon,
                "forecast complete"
            );
        }

        result
    }

    /// Top `n` candidates for the base window, best first
    pub fn rank_matches(
        &self,
        series: &TimeSeries,
        spec: &BaseWindowSpec,
        horizon: usize,
        n: usize,
    ) -> Result<Vec<Match>> {
        self.rank_matches_as_of(series, spec, horizon, n, None)
    }

    /// Like [`rank_matches`](Self::rank_matches) with an explicit reference
    /// instant, matching [`run_as_of`](Self::run_as_of)
    pub fn rank_matches_as_of(
        &self,
        series: &TimeSeries,
        spec: &BaseWindowSpec,
        horizon: usize,
        n: usize,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<Match>> {
        let (_, result) = self.staged("ranking", |stage| {
            let scanned = self.scan(series, spec, horizon, as_of, stage)?;

            *stage = PipelineStage::Selecting;
            let selector = MatchSelector::new(self.config.tie_break);
            let ranked = selector.rank(&scanned.outcome.matches, n);

            *stage = PipelineStage::Done;
            Ok(ranked)
        });

        if let Ok(ranked) = &result {
            debug!(returned = ranked.len(), requested = n, "ranking complete");
        }

        result
    }

    /// Run `body` from `Idle`, logging the stage that failed and ending in
    /// `Failed` on error
    fn staged<T>(
        &self,
        operation: &'static str,
        body: impl FnOnce(&mut PipelineStage) -> Result<T>,
    ) -> (PipelineStage, Result<T>) {
        let mut stage = PipelineStage::Idle;
        let result = body(&mut stage);

        if let Err(e) = &result {
            warn!(%stage, error = %e, "{} failed", operation);
            stage = PipelineStage::Failed;
        }

        (stage, result)
    }

    fn execute(
        &self,
        series: &TimeSeries,
        spec: &BaseWindowSpec,
        horizon: usize,
        as_of: Option<DateTime<Utc>>,
        stage: &mut PipelineStage,
    ) -> Result<ForecastResult> {
        let scanned = self.scan(series, spec, horizon, as_of, stage)?;
        let base = scanned.base;

        *stage = PipelineStage::Selecting;
        let best = MatchSelector::new(self.config.tie_break).select(&scanned.outcome)?;
        debug!(start = best.start, score = best.score, "selected match");

        *stage = PipelineStage::Extracting;
        let extractor = ForecastExtractor::new(base.len(), horizon)?;
        let visible = &series.values()[..scanned.visible_len];
        let matched_normalized = extractor.extract(visible, best.start)?;
        let matched_dates = extractor.extract_labels(series, best.start)?;
        let base_dates = series.labels(base.range())?;

        *stage = PipelineStage::Done;
        Ok(ForecastResult {
            base_dates,
            base_normalized: scanned.base_normalized.into_values(),
            matched_normalized,
            anchor_index: base.len() - 1,
            horizon,
            base_start: base.start(),
            match_start: best.start,
            match_score: best.score,
            matched_dates,
        })
    }

    fn scan(
        &self,
        series: &TimeSeries,
        spec: &BaseWindowSpec,
        horizon: usize,
        as_of: Option<DateTime<Utc>>,
        stage: &mut PipelineStage,
    ) -> Result<Scanned> {
        validate_horizon(horizon)?;
        if series.is_empty() {
            return Err(ForecastError::EmptySeries);
        }

        *stage = PipelineStage::ExtractingBase;
        let base = spec.resolve(series, as_of)?;
        // The search never sees data after the base window
        let visible = &series.values()[..base.end()];
        let base_normalized = normalize(base.slice(visible)?).map_err(|e| match e {
            MathError::DegenerateWindow { .. } => ForecastError::DegenerateWindow {
                start: base.start(),
                length: base.len(),
            },
            other => other.into(),
        })?;
        debug!(start = base.start(), len = base.len(), "resolved base window");

        *stage = PipelineStage::Scanning;
        let scanner = WindowScanner::new(base.len(), horizon)?.with_strategy(self.config.scan);
        let outcome = scanner.scan(visible, &base_normalized)?;

        Ok(Scanned {
            base,
            base_normalized,
            visible_len: visible.len(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn series(values: &[f64]) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::days(i as i64), *v)),
        )
        .unwrap()
    }

    #[test]
    fn test_successful_run_ends_done() {
        let pipeline = ForecastPipeline::default();
        let series = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let (stage, result) = pipeline.staged("forecast", |stage| {
            pipeline.execute(&series, &BaseWindowSpec::Trailing(5), 1, None, stage)
        });

        assert!(result.is_ok());
        assert_eq!(stage, PipelineStage::Done);
    }

    #[test]
    fn test_error_ends_failed() {
        let pipeline = ForecastPipeline::default();
        let flat = series(&[5.0; 12]);

        let mut reached = PipelineStage::Idle;
        let (stage, result) = pipeline.staged("forecast", |stage| {
            let result =
                pipeline.execute(&flat, &BaseWindowSpec::Trailing(5), 1, None, stage);
            reached = *stage;
            result
        });

        assert!(matches!(result, Err(ForecastError::DegenerateWindow { .. })));
        assert_eq!(reached, PipelineStage::ExtractingBase);
        assert_eq!(stage, PipelineStage::Failed);
    }

    #[test]
    fn test_ranking_failure_ends_failed() {
        let pipeline = ForecastPipeline::default();
        let short = series(&[1.0, 2.0, 3.0]);

        let (stage, result) = pipeline.staged("ranking", |stage| {
            pipeline.scan(&short, &BaseWindowSpec::Trailing(2), 5, None, stage)
        });

        assert!(matches!(
            result,
            Err(ForecastError::InsufficientHistory { .. })
        ));
        assert_eq!(stage, PipelineStage::Failed);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::ExtractingBase.to_string(), "extracting base");
        assert_eq!(PipelineStage::Failed.to_string(), "failed");
    }
}
