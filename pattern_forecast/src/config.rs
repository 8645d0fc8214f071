//! Forecast configuration

use crate::error::{ForecastError, Result};
use crate::scanner::ScanStrategy;
use crate::selector::TieBreak;
use crate::window::BaseWindowSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// Calendar days covered by the base window unless configured otherwise
pub const DEFAULT_BASE_LOOKBACK_DAYS: u32 = 90;

/// Longest accepted base lookback, one hundred years of calendar days
pub const MAX_BASE_LOOKBACK_DAYS: u32 = 36_500;

/// Points projected forward unless configured otherwise (one trading week)
pub const DEFAULT_HORIZON: usize = 5;

/// Accepted horizon values
pub const HORIZON_RANGE: RangeInclusive<usize> = 1..=365;

/// Parameters of a forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Calendar-day span of the base window
    pub base_lookback_days: u32,
    /// Number of points projected past the anchor
    pub horizon: usize,
    /// Winner among equal top scores
    pub tie_break: TieBreak,
    /// How candidate offsets are visited
    pub scan: ScanStrategy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_lookback_days: DEFAULT_BASE_LOOKBACK_DAYS,
            horizon: DEFAULT_HORIZON,
            tie_break: TieBreak::default(),
            scan: ScanStrategy::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse a configuration from JSON; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ForecastError::ConfigError(format!("Invalid forecast config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the configuration as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if self.base_lookback_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Base lookback must be at least one day".to_string(),
            ));
        }
        if self.base_lookback_days > MAX_BASE_LOOKBACK_DAYS {
            return Err(ForecastError::InvalidParameter(format!(
                "Base lookback must be at most {} days, got {}",
                MAX_BASE_LOOKBACK_DAYS, self.base_lookback_days
            )));
        }
        validate_horizon(self.horizon)
    }

    pub fn with_base_lookback_days(mut self, days: u32) -> Self {
        self.base_lookback_days = days;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_scan(mut self, scan: ScanStrategy) -> Self {
        self.scan = scan;
        self
    }

    /// The base window this configuration describes
    pub fn base_window(&self) -> BaseWindowSpec {
        BaseWindowSpec::CalendarDays(self.base_lookback_days)
    }
}

/// Reject horizons outside 1..=365
pub fn validate_horizon(horizon: usize) -> Result<()> {
    if !HORIZON_RANGE.contains(&horizon) {
        return Err(ForecastError::InvalidParameter(format!(
            "Horizon must be between {} and {}, got {}",
            HORIZON_RANGE.start(),
            HORIZON_RANGE.end(),
            horizon
        )));
    }
    Ok(())
}
