#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use pattern_forecast::data::TimeSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Consecutive calendar days starting 2024-01-01
pub fn daily_series(values: &[f64]) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates = (0..values.len())
        .map(|i| start + Duration::days(i as i64))
        .collect();
    TimeSeries::from_dates(dates, values.to_vec()).unwrap()
}

/// Seeded random-walk prices that stay positive
pub fn random_walk(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let steps = Normal::new(0.0, 1.0).unwrap();

    let mut price = 200.0_f64;
    (0..len)
        .map(|_| {
            price = (price + steps.sample(&mut rng)).max(1.0);
            price
        })
        .collect()
}
