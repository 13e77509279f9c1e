//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stockscore::{PriceBar, PriceSeries};

pub fn day(n: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(n as u64)
}

/// Flat-bodied bar one point either side of the close.
pub fn bar(n: usize, close: f64) -> PriceBar {
    PriceBar {
        date: day(n),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes.iter().enumerate().map(|(i, &c)| bar(i, c)).collect()
}

/// 252 sessions: a 232-day climb from 50 in half-point steps, then a
/// 20-day slide of 3 points a day to 105.5. The last bar wicks to 101.5.
///
/// Scores (Buy, 3): both trend crosses, RSI, stochastic and VWAP are
/// bullish; MACD and OBV are bearish; Bollinger and Donchian are neutral.
pub fn golden_bars() -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = (0..252)
        .map(|i| {
            let close = if i < 232 {
                50.0 + 0.5 * i as f64
            } else {
                165.5 - 3.0 * (i - 231) as f64
            };
            bar(i, close)
        })
        .collect();

    if let Some(last) = bars.last_mut() {
        last.low = last.close - 4.0;
    }
    bars
}

pub fn golden_series() -> PriceSeries {
    PriceSeries::new(golden_bars()).unwrap()
}

/// Seeded random walk of valid bars.
pub fn random_walk(seed: u64, count: usize) -> Vec<PriceBar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut close: f64 = rng.gen_range(20.0..200.0);

    (0..count)
        .map(|i| {
            let open = close;
            close = (close + rng.gen_range(-3.0..3.0)).max(1.0);
            let wick = rng.gen_range(0.0..2.0);
            PriceBar {
                date: day(i),
                open,
                high: open.max(close) + wick,
                low: (open.min(close) - wick).max(0.0),
                close,
                volume: rng.gen_range(0..50_000),
            }
        })
        .collect()
}
