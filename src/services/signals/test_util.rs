use chrono::NaiveDate;

use crate::types::{PriceBar, PriceSeries};

/// Asserts that two `f64` values are equal within `1e-9`.
macro_rules! assert_close {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (f64, f64) = ($actual, $expected);
        assert!(
            (a - e).abs() < 1e-9,
            "assert_close failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_close;

pub fn day(n: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(n as u64)
}

/// Bar with a one-point range around `close`.
pub fn bar(n: usize, close: f64) -> PriceBar {
    PriceBar {
        date: day(n),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000,
    }
}

/// Bars built from a list of closes.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes.iter().enumerate().map(|(i, &c)| bar(i, c)).collect()
}

/// Closes rising by one point per bar from 100.
pub fn rising_bars(count: usize) -> Vec<PriceBar> {
    (0..count).map(|i| bar(i, 100.0 + i as f64)).collect()
}

/// Closes falling by one point per bar from 400.
pub fn falling_bars(count: usize) -> Vec<PriceBar> {
    (0..count).map(|i| bar(i, 400.0 - i as f64)).collect()
}

pub fn series(bars: Vec<PriceBar>) -> PriceSeries {
    PriceSeries::new(bars).expect("test bars are valid")
}
