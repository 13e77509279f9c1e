//! SQLite persistence for daily OHLCV bars.
//!
//! One table keyed by `(ticker, date)`. Rows are only ever inserted;
//! re-ingesting a date that is already stored is a no-op.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::{BarStore, SeriesProvider};
use crate::error::{AppError, Result, ScoreError};
use crate::types::{PriceBar, PriceSeries};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite store for daily bars.
pub struct SqliteSeriesStore {
    conn: Mutex<Connection>,
}

/// A bar as read back from the table, before validation.
struct StoredRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

impl StoredRow {
    fn into_bar(self, index: usize) -> std::result::Result<PriceBar, ScoreError> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            ScoreError::MalformedBar {
                index,
                date: NaiveDate::MIN,
                reason: format!("unparseable date {:?}: {}", self.date, e),
            }
        })?;

        let volume = u64::try_from(self.volume).map_err(|_| ScoreError::MalformedBar {
            index,
            date,
            reason: format!("volume is negative ({})", self.volume),
        })?;

        Ok(PriceBar {
            date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume,
        })
    }
}

/// Validate a bar for insertion and convert its volume to the column type.
fn storable_row(
    index: usize,
    bar: &PriceBar,
) -> std::result::Result<(&PriceBar, i64), ScoreError> {
    bar.check().map_err(|reason| ScoreError::MalformedBar {
        index,
        date: bar.date,
        reason,
    })?;

    let volume = i64::try_from(bar.volume).map_err(|_| ScoreError::MalformedBar {
        index,
        date: bar.date,
        reason: format!("volume {} does not fit in storage", bar.volume),
    })?;

    Ok((bar, volume))
}

impl SqliteSeriesStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite series store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite series store initialized");
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("series store lock poisoned".to_string()))
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS price_bars (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (ticker, date)
            )",
            [],
        )?;

        Ok(())
    }

    /// All tickers with at least one stored bar.
    pub fn tickers(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT ticker FROM price_bars ORDER BY ticker")?;
        let tickers = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(tickers)
    }

    /// Remove every bar stored for a ticker. Returns the number of rows deleted.
    pub fn delete_ticker(&self, ticker: &str) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM price_bars WHERE ticker = ?1", params![ticker])?;
        info!("Deleted {} bars for {}", deleted, ticker);
        Ok(deleted)
    }
}

impl SeriesProvider for SqliteSeriesStore {
    fn fetch_series(&self, ticker: &str, window: usize) -> Result<PriceSeries> {
        let rows = {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(
                "SELECT date, open, high, low, close, volume
                 FROM price_bars WHERE ticker = ?1
                 ORDER BY date DESC LIMIT ?2",
            )?;
            let limit = i64::try_from(window).unwrap_or(i64::MAX);
            let rows = stmt
                .query_map(params![ticker, limit], |row| {
                    Ok(StoredRow {
                        date: row.get(0)?,
                        open: row.get(1)?,
                        high: row.get(2)?,
                        low: row.get(3)?,
                        close: row.get(4)?,
                        volume: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        if rows.is_empty() {
            return Err(AppError::NotFound(format!("no price data for {}", ticker)));
        }

        let bars = rows
            .into_iter()
            .rev()
            .enumerate()
            .map(|(index, row)| row.into_bar(index))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded {} bars for {}", bars.len(), ticker);
        Ok(PriceSeries::new(bars)?)
    }
}

impl BarStore for SqliteSeriesStore {
    fn last_date(&self, ticker: &str) -> Result<Option<NaiveDate>> {
        let conn = self.lock()?;
        let last: Option<String> = conn
            .query_row(
                "SELECT MAX(date) FROM price_bars WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        last.map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|e| AppError::Internal(format!("bad stored date {:?}: {}", s, e)))
        })
        .transpose()
    }

    fn insert_bars(&self, ticker: &str, bars: &[PriceBar]) -> Result<usize> {
        // Reject the whole batch before touching the table.
        let rows = bars
            .iter()
            .enumerate()
            .map(|(index, bar)| storable_row(index, bar))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO price_bars (ticker, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (bar, volume) in rows {
                inserted += stmt.execute(params![
                    ticker,
                    bar.date.format(DATE_FORMAT).to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    volume,
                ])?;
            }
        }

        tx.commit()?;
        debug!("Inserted {} of {} bars for {}", inserted, bars.len(), ticker);
        Ok(inserted)
    }
}
