//! Incremental download of daily bars into a bar store.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use super::BarStore;
use crate::error::Result;
use crate::sources::YahooFinanceClient;
use crate::types::PriceBar;

/// Pulls bars newer than the last stored date from Yahoo Finance.
#[derive(Clone)]
pub struct MarketDataIngestor {
    store: Arc<dyn BarStore>,
    client: Arc<YahooFinanceClient>,
}

/// Keep only bars strictly after `last`.
fn bars_after(bars: Vec<PriceBar>, last: Option<NaiveDate>) -> Vec<PriceBar> {
    match last {
        Some(last) => bars.into_iter().filter(|b| b.date > last).collect(),
        None => bars,
    }
}

impl MarketDataIngestor {
    pub fn new(store: Arc<dyn BarStore>, client: Arc<YahooFinanceClient>) -> Self {
        Self { store, client }
    }

    /// Download and store any bars after the newest stored one.
    /// Returns the number of bars inserted.
    pub async fn refresh(&self, ticker: &str) -> Result<usize> {
        let last = self.store.last_date(ticker)?;
        let since = last.and_then(|d| d.succ_opt());

        if let Some(start) = since {
            if start > Utc::now().date_naive() {
                debug!("{} is already up to date", ticker);
                return Ok(0);
            }
        }

        let fetched = self.client.daily_bars(ticker, since).await?;
        let fresh = bars_after(fetched, last);
        if fresh.is_empty() {
            debug!("No new bars for {}", ticker);
            return Ok(0);
        }

        let inserted = self.store.insert_bars(ticker, &fresh)?;
        info!("Ingested {} new bars for {}", inserted, ticker);
        Ok(inserted)
    }
}
