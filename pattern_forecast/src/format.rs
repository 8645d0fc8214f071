//! Compact display strings for quote figures
//!
//! Prices are rounded half-up to two decimals with a trailing `.00`
//! dropped; anything whose whole part runs past three digits is shown as
//! its leading digit group plus a magnitude suffix (`7485275` -> `7.49M`).

use crate::data::DailyBar;
use crate::error::{ForecastError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Longest integer, in characters, that has a suffix
const MAX_SUFFIX_DIGITS: usize = 15;

/// Magnitude suffix for an integer written as a string.
///
/// `""` below four digits, then `k`, `M`, `B` and `T` every three digits.
pub fn number_suffix(number: &str) -> Result<&'static str> {
    if number.is_empty() {
        return Err(ForecastError::ParseError(
            "The number must have at least 1 digit".to_string(),
        ));
    }
    // Rejects separators and decimal points
    number.parse::<i128>()?;

    let suffix = match number.len() {
        n if n > MAX_SUFFIX_DIGITS => {
            return Err(ForecastError::InvalidParameter(format!(
                "Numbers longer than {} digits have no suffix",
                MAX_SUFFIX_DIGITS
            )))
        }
        13.. => "T",
        10.. => "B",
        7.. => "M",
        4.. => "k",
        _ => "",
    };
    Ok(suffix)
}

fn parse_decimal(number: &str) -> Result<Decimal> {
    number
        .parse::<Decimal>()
        .map_err(|e| ForecastError::ParseError(format!("'{}' is not a number: {}", number, e)))
}

fn two_places(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Round a number for display
pub fn round_display(number: &str) -> Result<String> {
    let number = number.trim();
    if number.is_empty() {
        return Err(ForecastError::ParseError(
            "The input must not be empty".to_string(),
        ));
    }

    let mut parts = number.split('.');
    let whole = parts.next().unwrap_or_default();
    if parts.count() > 1 {
        return Err(ForecastError::ParseError(format!(
            "Too many decimal points in '{}'",
            number
        )));
    }

    // Large values drop their fraction entirely
    let number = if whole.len() > 3 { whole } else { number };

    if !number.contains('.') {
        let suffix = number_suffix(number)?;
        if number.len() <= 3 {
            return Ok(number.to_string());
        }

        let lead = match number.len() % 3 {
            0 => 3,
            n => n,
        };
        let scale = Decimal::from(10u64.pow((number.len() - lead) as u32));
        return Ok(format!("{}{}", two_places(parse_decimal(number)? / scale), suffix));
    }

    let rounded = two_places(parse_decimal(number)?).to_string();
    match rounded.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => Ok(whole.to_string()),
        _ => Ok(rounded),
    }
}

/// Round a float for display
pub fn round_display_f64(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(ForecastError::InvalidParameter(format!(
            "Cannot display non-finite value {}",
            value
        )));
    }
    round_display(&value.to_string())
}

/// Display strings for the latest bar of a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteSummary {
    pub high: String,
    pub low: String,
    pub close: String,
    pub adjusted_close: String,
    pub volume: String,
}

impl QuoteSummary {
    /// Format a bar's figures
    pub fn from_bar(bar: &DailyBar) -> Result<Self> {
        Ok(Self {
            high: round_display_f64(bar.high)?,
            low: round_display_f64(bar.low)?,
            close: round_display_f64(bar.close)?,
            adjusted_close: round_display_f64(bar.adjusted_close)?,
            volume: round_display(&bar.volume.to_string())?,
        })
    }

    /// `(label, value)` rows in panel order
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("High", self.high.as_str()),
            ("Low", self.low.as_str()),
            ("Close", self.close.as_str()),
            ("Adj Close", self.adjusted_close.as_str()),
            ("Volume", self.volume.as_str()),
        ]
    }
}
