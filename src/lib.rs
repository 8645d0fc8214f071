//! # MarketMaster
//!
//! `marketmaster_workspace` bundles the pattern-match forecasting engine:
//! [`math`] holds the window kernels and [`forecast`] the data model and
//! pipeline built on them.
//!
//! ## Example
//!
//! ```
//! use marketmaster_workspace::math::{normalize, score};
//!
//! let recent = normalize(&[101.0, 103.0, 102.0, 106.0]).unwrap();
//! let older = normalize(&[11.0, 13.0, 12.0, 16.0]).unwrap();
//!
//! // Same shape at a different price level
//! assert!((score(&recent, &older).unwrap() - 1.0).abs() < 1e-12);
//! ```

pub use pattern_forecast as forecast;
pub use pattern_math as math;

/// The types most callers need
pub mod prelude {
    pub use pattern_forecast::{
        BarSeries, BaseWindowSpec, DailyBar, DataLoader, ForecastConfig, ForecastError,
        ForecastPipeline, ForecastResult, QuoteSummary, ScanStrategy, TieBreak, TimeSeries,
    };
}
