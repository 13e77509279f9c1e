pub mod ingest;
pub mod memory_store;
pub mod series_store;
pub mod signals;
pub mod technical;

pub use ingest::MarketDataIngestor;
pub use memory_store::InMemorySeriesStore;
pub use series_store::SqliteSeriesStore;
pub use signals::{compute_score, ScoringConfig, SignalEngine, SignalLineSource};
pub use technical::TechnicalService;

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::types::{PriceBar, PriceSeries};

/// Supplies the most recent bars for a ticker.
pub trait SeriesProvider: Send + Sync {
    /// The most recent `window` bars for `ticker`, ascending by date.
    fn fetch_series(&self, ticker: &str, window: usize) -> Result<PriceSeries>;
}

/// A bar store that can also be written to by ingestion.
pub trait BarStore: SeriesProvider {
    /// Date of the newest stored bar, if any.
    fn last_date(&self, ticker: &str) -> Result<Option<NaiveDate>>;

    /// Insert bars, ignoring dates already stored. Returns how many were new.
    fn insert_bars(&self, ticker: &str, bars: &[PriceBar]) -> Result<usize>;
}

const MAX_TICKER_LEN: usize = 12;

/// Normalize a user-supplied ticker to its stored form.
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_uppercase();

    if ticker.is_empty() || ticker.len() > MAX_TICKER_LEN {
        return Err(AppError::BadRequest(format!("invalid ticker: {:?}", raw)));
    }

    let valid = ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(AppError::BadRequest(format!("invalid ticker: {:?}", raw)));
    }

    Ok(ticker)
}
