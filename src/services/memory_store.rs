//! In-memory bar store backed by a concurrent map.

use chrono::NaiveDate;
use dashmap::DashMap;
use std::collections::BTreeMap;

use super::{BarStore, SeriesProvider};
use crate::error::{AppError, Result, ScoreError};
use crate::types::{PriceBar, PriceSeries};

/// Thread-safe in-memory bar store keyed by ticker.
#[derive(Default)]
pub struct InMemorySeriesStore {
    bars: DashMap<String, BTreeMap<NaiveDate, PriceBar>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding one ticker's bars.
    pub fn with_bars(ticker: &str, bars: &[PriceBar]) -> Self {
        let store = Self::new();
        store.put(ticker, bars);
        store
    }

    fn put(&self, ticker: &str, bars: &[PriceBar]) -> usize {
        let mut entry = self.bars.entry(ticker.to_string()).or_default();
        let mut inserted = 0;
        for bar in bars {
            if !entry.contains_key(&bar.date) {
                entry.insert(bar.date, *bar);
                inserted += 1;
            }
        }
        inserted
    }
}

impl SeriesProvider for InMemorySeriesStore {
    fn fetch_series(&self, ticker: &str, window: usize) -> Result<PriceSeries> {
        let entry = self
            .bars
            .get(ticker)
            .filter(|bars| !bars.is_empty())
            .ok_or_else(|| AppError::NotFound(format!("no price data for {}", ticker)))?;

        let skip = entry.len().saturating_sub(window);
        let bars: Vec<PriceBar> = entry.values().skip(skip).copied().collect();
        drop(entry);

        Ok(PriceSeries::new(bars)?)
    }
}

impl BarStore for InMemorySeriesStore {
    fn last_date(&self, ticker: &str) -> Result<Option<NaiveDate>> {
        Ok(self
            .bars
            .get(ticker)
            .and_then(|bars| bars.keys().next_back().copied()))
    }

    fn insert_bars(&self, ticker: &str, bars: &[PriceBar]) -> Result<usize> {
        for (index, bar) in bars.iter().enumerate() {
            bar.check().map_err(|reason| ScoreError::MalformedBar {
                index,
                date: bar.date,
                reason,
            })?;
        }
        Ok(self.put(ticker, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_util::{day, rising_bars};

    #[test]
    fn test_window_is_most_recent() {
        let bars = rising_bars(50);
        let store = InMemorySeriesStore::with_bars("SPY", &bars);
        let series = store.fetch_series("SPY", 20).unwrap();
        assert_eq!(series.bars(), &bars[30..]);
    }

    #[test]
    fn test_out_of_order_inserts_come_back_sorted() {
        let bars = rising_bars(10);
        let store = InMemorySeriesStore::new();
        store.insert_bars("SPY", &bars[5..]).unwrap();
        store.insert_bars("SPY", &bars[..5]).unwrap();
        assert_eq!(store.fetch_series("SPY", 100).unwrap().bars(), &bars[..]);
        assert_eq!(store.last_date("SPY").unwrap(), Some(day(9)));
    }

    #[test]
    fn test_duplicates_ignored() {
        let bars = rising_bars(10);
        let store = InMemorySeriesStore::with_bars("SPY", &bars);
        assert_eq!(store.insert_bars("SPY", &bars).unwrap(), 0);
    }

    #[test]
    fn test_insert_rejects_malformed_batch() {
        let store = InMemorySeriesStore::new();
        let mut bars = rising_bars(4);
        bars[2].close = f64::INFINITY;
        assert!(matches!(
            store.insert_bars("SPY", &bars),
            Err(AppError::Score(ScoreError::MalformedBar { index: 2, .. }))
        ));
        assert_eq!(store.last_date("SPY").unwrap(), None);
    }

    #[test]
    fn test_missing_ticker() {
        let store = InMemorySeriesStore::new();
        assert!(matches!(
            store.fetch_series("SPY", 10),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.last_date("SPY").unwrap(), None);
    }
}
