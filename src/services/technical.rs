//! Ticker-level technical scoring.

use std::sync::Arc;
use tracing::{debug, warn};

use super::signals::SignalEngine;
use super::{normalize_ticker, BarStore, MarketDataIngestor};
use crate::error::{AppError, Result};
use crate::types::{PriceBar, PriceSeries, Recommendation, Score, ScoreReport};

/// Loads a ticker's recent bars and scores them.
pub struct TechnicalService {
    store: Arc<dyn BarStore>,
    ingestor: Option<MarketDataIngestor>,
    engine: SignalEngine,
    window: usize,
    refresh_on_request: bool,
}

impl TechnicalService {
    /// `window` is raised to the engine's minimum when smaller.
    pub fn new(store: Arc<dyn BarStore>, engine: SignalEngine, window: usize) -> Self {
        Self {
            store,
            ingestor: None,
            window: window.max(engine.required_bars()),
            engine,
            refresh_on_request: false,
        }
    }

    /// Attach an ingestor. When `refresh_on_request` is set every scoring
    /// call first pulls any new bars.
    pub fn with_ingestor(mut self, ingestor: MarketDataIngestor, refresh_on_request: bool) -> Self {
        self.ingestor = Some(ingestor);
        self.refresh_on_request = refresh_on_request;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    /// Score a ticker from stored bars. Returns the normalized ticker
    /// alongside the report.
    pub async fn report(&self, raw_ticker: &str) -> Result<(String, ScoreReport)> {
        let ticker = normalize_ticker(raw_ticker)?;

        if self.refresh_on_request {
            if let Some(ingestor) = &self.ingestor {
                if let Err(e) = ingestor.refresh(&ticker).await {
                    warn!("Refresh failed for {}, scoring stored bars: {}", ticker, e);
                }
            }
        }

        let series = self.store.fetch_series(&ticker, self.window)?;
        debug!("Scoring {} over {} bars", ticker, series.len());
        let report = self.engine.evaluate(&series)?;
        Ok((ticker, report))
    }

    /// Score a ticker and keep only the recommendation and score.
    pub async fn score_ticker(&self, raw_ticker: &str) -> Result<(String, Recommendation, Score)> {
        let (ticker, report) = self.report(raw_ticker).await?;
        Ok((ticker, report.recommendation, report.score))
    }

    /// Pull new bars for a ticker. Returns the normalized ticker and the
    /// number of bars inserted.
    pub async fn refresh(&self, raw_ticker: &str) -> Result<(String, usize)> {
        let ticker = normalize_ticker(raw_ticker)?;
        let ingestor = self
            .ingestor
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("market data refresh is disabled".to_string()))?;
        let inserted = ingestor.refresh(&ticker).await?;
        Ok((ticker, inserted))
    }

    /// Score caller-supplied bars without touching the store.
    pub fn score_bars(&self, bars: Vec<PriceBar>) -> Result<ScoreReport> {
        let series = PriceSeries::new(bars)?;
        Ok(self.engine.evaluate(&series)?)
    }
}
