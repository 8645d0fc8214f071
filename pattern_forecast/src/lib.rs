//! # Pattern Forecast
//!
//! Nearest-neighbour shape matching over a price history.
//!
//! The most recent stretch of a series (the *base window*) is compared by
//! shape against every earlier window of the same length. The best match
//! and the points that followed it are returned as a naive projection.
//!
//! ## Features
//!
//! - Base windows by calendar span, date range or trailing count
//! - Min-max normalization so windows compare independent of price level
//! - Cosine similarity scoring with a deterministic tie-break
//! - Sequential (rolling min/max) or parallel (rayon) candidate scans
//! - Daily bar loading from CSV or a polars `DataFrame`
//! - Display formatting for the latest quote
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pattern_forecast::data::DataLoader;
//! use pattern_forecast::{ForecastConfig, ForecastPipeline};
//!
//! # fn main() -> pattern_forecast::Result<()> {
//! let bars = DataLoader::from_csv("spx.csv")?;
//! let closes = bars.close_series()?;
//!
//! // Last 90 calendar days against all history, one week ahead
//! let pipeline = ForecastPipeline::new(ForecastConfig::default().with_horizon(5))?;
//! let forecast = pipeline.forecast(&closes)?;
//!
//! println!(
//!     "best analog starts at {} (score {:.3}); anchor at {}",
//!     forecast.match_start, forecast.match_score, forecast.anchor_index
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod extractor;
pub mod format;
pub mod pipeline;
pub mod scanner;
pub mod selector;
pub mod window;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{BarSeries, DailyBar, DataLoader, TimeSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::extractor::ForecastExtractor;
pub use crate::format::QuoteSummary;
pub use crate::pipeline::{ForecastPipeline, ForecastResult, PipelineStage};
pub use crate::scanner::{Match, ScanOutcome, ScanStrategy, WindowScanner};
pub use crate::selector::{MatchSelector, TieBreak};
pub use crate::window::{BaseWindowSpec, Window};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
