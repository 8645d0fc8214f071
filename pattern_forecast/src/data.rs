//! Price history handling for pattern matching

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::ops::Range;
use std::path::Path;

/// Ordered, immutable price history
///
/// Timestamps are strictly increasing and every value is a finite,
/// non-negative price.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new TimeSeries from timestamps and values
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }

        if let Some(i) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ForecastError::DataError(format!(
                "Timestamps must be strictly increasing: {} is followed by {}",
                timestamps[i],
                timestamps[i + 1]
            )));
        }

        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ForecastError::DataError(format!(
                "Value at index {} must be a finite non-negative price, got {}",
                i, v
            )));
        }

        Ok(Self { timestamps, values })
    }

    /// Create a TimeSeries from `(timestamp, value)` pairs
    pub fn from_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let (timestamps, values) = points.into_iter().unzip();
        Self::new(timestamps, values)
    }

    /// Create a TimeSeries of daily values, each stamped at midnight UTC
    pub fn from_dates(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        let timestamps = dates.into_iter().map(midnight_utc).collect();
        Self::new(timestamps, values)
    }

    /// Get the values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the timestamps
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get the last timestamp, if any
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Index of the first point at or after `ts`
    pub fn lower_bound(&self, ts: DateTime<Utc>) -> usize {
        self.timestamps.partition_point(|t| *t < ts)
    }

    /// Index of the first point strictly after `ts`
    pub fn upper_bound(&self, ts: DateTime<Utc>) -> usize {
        self.timestamps.partition_point(|t| *t <= ts)
    }

    /// `YYYY-MM-DD` labels for the points in `range`
    pub fn labels(&self, range: Range<usize>) -> Result<Vec<String>> {
        let stamps = self.timestamps.get(range.clone()).ok_or_else(|| {
            ForecastError::DataError(format!(
                "Label range {:?} is out of bounds for series of length {}",
                range,
                self.len()
            ))
        })?;

        Ok(stamps
            .iter()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .collect())
    }
}

/// One day of market data for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: u64,
}

/// Daily bars ordered by date
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarSeries {
    bars: Vec<DailyBar>,
}

impl BarSeries {
    /// Create a new BarSeries, checking dates are strictly increasing
    pub fn new(bars: Vec<DailyBar>) -> Result<Self> {
        if let Some(i) = bars.windows(2).position(|w| w[0].date >= w[1].date) {
            return Err(ForecastError::DataError(format!(
                "Bar dates must be strictly increasing: {} is followed by {}",
                bars[i].date,
                bars[i + 1].date
            )));
        }

        for bar in &bars {
            let prices = [bar.high, bar.low, bar.close, bar.adjusted_close];
            if prices.iter().chain(bar.open.iter()).any(|p| !p.is_finite() || *p < 0.0) {
                return Err(ForecastError::DataError(format!(
                    "Bar on {} has a negative or non-finite price",
                    bar.date
                )));
            }
        }

        Ok(Self { bars })
    }

    /// Get the bars
    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    /// The most recent bar, shown in the quote panel
    pub fn latest(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices as the series the matcher compares
    pub fn close_series(&self) -> Result<TimeSeries> {
        self.series_of(|bar| bar.close)
    }

    /// Adjusted close prices as a series
    pub fn adjusted_close_series(&self) -> Result<TimeSeries> {
        self.series_of(|bar| bar.adjusted_close)
    }

    fn series_of(&self, field: impl Fn(&DailyBar) -> f64) -> Result<TimeSeries> {
        let dates = self.bars.iter().map(|bar| bar.date).collect();
        let values = self.bars.iter().map(field).collect();
        TimeSeries::from_dates(dates, values)
    }
}

/// Data loader for daily bar data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load daily bars from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<BarSeries> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Build daily bars from an existing DataFrame
    ///
    /// Column names are matched ignoring case, spaces, underscores and
    /// dashes, so `Adj Close`, `adj_close` and `AdjClose` all resolve.
    pub fn from_dataframe(df: &DataFrame) -> Result<BarSeries> {
        let date_column = Self::find_column(df, &["date", "datetime", "timestamp", "time"])
            .ok_or_else(|| ForecastError::DataError("No date column found in data".to_string()))?;
        let high_column = Self::required_column(df, &["high"])?;
        let low_column = Self::required_column(df, &["low"])?;
        let close_column = Self::required_column(df, &["close", "price"])?;
        let open_column = Self::find_column(df, &["open"]);
        let adj_column = Self::find_column(df, &["adjclose", "adjustedclose"]);
        let volume_column = Self::find_column(df, &["volume", "vol"]);

        let dates = column_as_dates(df, &date_column)?;
        let highs = column_as_f64(df, &high_column)?;
        let lows = column_as_f64(df, &low_column)?;
        let closes = column_as_f64(df, &close_column)?;
        let opens = match &open_column {
            Some(name) => Some(column_as_f64(df, name)?),
            None => None,
        };
        let adjusted = match &adj_column {
            Some(name) => column_as_f64(df, name)?,
            None => closes.clone(),
        };
        let volumes = match &volume_column {
            Some(name) => column_as_u64(df, name)?,
            None => vec![0; dates.len()],
        };

        let bars = (0..dates.len())
            .map(|i| DailyBar {
                date: dates[i],
                open: opens.as_ref().map(|o| o[i]),
                high: highs[i],
                low: lows[i],
                close: closes[i],
                adjusted_close: adjusted[i],
                volume: volumes[i],
            })
            .collect();

        BarSeries::new(bars)
    }

    fn required_column(df: &DataFrame, keys: &[&str]) -> Result<String> {
        Self::find_column(df, keys).ok_or_else(|| {
            ForecastError::DataError(format!("No '{}' column found in data", keys[0]))
        })
    }

    fn find_column(df: &DataFrame, keys: &[&str]) -> Option<String> {
        let column_names = df.get_column_names();

        keys.iter().find_map(|key| {
            column_names
                .iter()
                .find(|name| canonical_name(name) == *key)
                .map(|name| name.to_string())
        })
    }
}

fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(NaiveDateTime::new(date, NaiveTime::default()), Utc)
}

/// Parse `YYYY-MM-DD`, ignoring any trailing time component
pub(crate) fn parse_date(text: &str) -> Result<NaiveDate> {
    let day = text
        .trim()
        .split(|c| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();
    Ok(NaiveDate::parse_from_str(day, "%Y-%m-%d")?)
}

fn missing_value(column_name: &str, row: usize) -> ForecastError {
    ForecastError::DataError(format!(
        "Column '{}' has a missing value at row {}",
        column_name, row
    ))
}

fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;
    if !col.dtype().is_numeric() {
        return Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            column_name
        )));
    }

    let casted = col.cast(&DataType::Float64)?;
    let values = casted.f64()?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| missing_value(column_name, row)))
        .collect()
}

fn column_as_u64(df: &DataFrame, column_name: &str) -> Result<Vec<u64>> {
    column_as_f64(df, column_name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            if v.is_finite() && v >= 0.0 {
                Ok(v.round() as u64)
            } else {
                Err(ForecastError::DataError(format!(
                    "Column '{}' has an invalid volume {} at row {}",
                    column_name, v, row
                )))
            }
        })
        .collect()
}

fn column_as_dates(df: &DataFrame, column_name: &str) -> Result<Vec<NaiveDate>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| ForecastError::DataError("Invalid epoch date".to_string()))?;
    let from_epoch_days = |days: i64| {
        epoch
            .checked_add_signed(Duration::days(days))
            .ok_or_else(|| ForecastError::DataError(format!("Date out of range: {} days", days)))
    };

    match col.dtype() {
        DataType::Utf8 => col
            .utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| parse_date(v.ok_or_else(|| missing_value(column_name, row))?))
            .collect(),
        DataType::Date => {
            let days = col.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| from_epoch_days(v.ok_or_else(|| missing_value(column_name, row))? as i64))
                .collect()
        }
        DataType::Datetime(unit, _) => {
            let per_day: i64 = match unit {
                TimeUnit::Nanoseconds => 86_400_000_000_000,
                TimeUnit::Microseconds => 86_400_000_000,
                TimeUnit::Milliseconds => 86_400_000,
            };
            let raw = col.cast(&DataType::Int64)?;
            raw.i64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    let ts = v.ok_or_else(|| missing_value(column_name, row))?;
                    from_epoch_days(ts.div_euclid(per_day))
                })
                .collect()
        }
        other => Err(ForecastError::DataError(format!(
            "Column '{}' of type {} cannot be read as dates",
            column_name, other
        ))),
    }
}
