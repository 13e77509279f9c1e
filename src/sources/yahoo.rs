//! Yahoo Finance API client for daily stock history.
//!
//! Uses the unofficial v8 chart endpoint, which needs no API key.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::types::PriceBar;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace('.', "-")
}

/// Parse a chart response body into daily bars, ascending by date.
///
/// Rows without a close are skipped. Missing open/high/low fall back to the
/// close and a missing volume counts as zero. Rows that still fail bar
/// validation are dropped with a warning. When two rows land on the same
/// calendar date the later one wins.
pub fn parse_chart_response(body: &str) -> Result<Vec<PriceBar>> {
    let data: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| AppError::ExternalApi(format!("Parse error: {}", e)))?;

    if let Some(error) = data.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::ExternalApi("No results in response".to_string()))?;

    // A range with no trading days comes back without timestamps.
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AppError::ExternalApi("No quote data in response".to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive()) else {
            warn!("Skipping Yahoo row with bad timestamp {}", timestamp);
            continue;
        };

        let bar = PriceBar {
            date,
            open: opens.get(i).copied().flatten().unwrap_or(close),
            high: highs.get(i).copied().flatten().unwrap_or(close),
            low: lows.get(i).copied().flatten().unwrap_or(close),
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0),
        };

        if let Err(reason) = bar.check() {
            warn!("Skipping Yahoo row for {}: {}", date, reason);
            continue;
        }

        match bars.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            Some(prev) if prev.date > bar.date => {
                warn!("Skipping out-of-order Yahoo row for {}", date);
            }
            _ => bars.push(bar),
        }
    }

    Ok(bars)
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (mirrors, local fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn chart_url(&self, symbol: &str, since: Option<NaiveDate>) -> String {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        match since {
            Some(start) => {
                let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
                let period2 = Utc::now().timestamp();
                format!(
                    "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&includePrePost=false",
                    self.base_url, yahoo_symbol, period1, period2
                )
            }
            None => format!(
                "{}/v8/finance/chart/{}?range=max&interval=1d&includePrePost=false",
                self.base_url, yahoo_symbol
            ),
        }
    }

    /// Fetch daily bars for a symbol, from `since` (inclusive) when given,
    /// otherwise the full available history.
    pub async fn daily_bars(&self, symbol: &str, since: Option<NaiveDate>) -> Result<Vec<PriceBar>> {
        let url = self.chart_url(symbol, since);
        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error for {}: {}",
                symbol,
                response.status()
            )));
        }

        let body = response.text().await?;
        let bars = parse_chart_response(&body)?;
        debug!("Yahoo returned {} daily bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}
