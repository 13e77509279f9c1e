use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// One trading day of OHLCV data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Check the invariants of a single bar.
    /// Returns a description of the first violation found.
    pub fn check(&self) -> Result<(), String> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(format!("{} is not a finite number", name));
            }
            if value < 0.0 {
                return Err(format!("{} is negative ({})", name, value));
            }
        }

        if self.high < self.low {
            return Err(format!("high {} is below low {}", self.high, self.low));
        }
        if self.open < self.low {
            return Err(format!("open {} is below low {}", self.open, self.low));
        }
        if self.close < self.low {
            return Err(format!("close {} is below low {}", self.close, self.low));
        }

        Ok(())
    }
}

/// Chronologically ordered, validated sequence of daily bars.
///
/// Construction rejects the whole series when any bar is malformed or when
/// dates are not strictly increasing. Once built, the series is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap a list of bars.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, ScoreError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.check().map_err(|reason| ScoreError::MalformedBar {
                index,
                date: bar.date,
                reason,
            })?;

            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date <= previous {
                    return Err(ScoreError::MalformedBar {
                        index,
                        date: bar.date,
                        reason: format!("date is not after the previous bar ({})", previous),
                    });
                }
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Keep only the most recent `window` bars.
    pub fn tail(&self, window: usize) -> PriceSeries {
        let start = self.bars.len().saturating_sub(window);
        Self {
            bars: self.bars[start..].to_vec(),
        }
    }

    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}

impl AsRef<[PriceBar]> for PriceSeries {
    fn as_ref(&self) -> &[PriceBar] {
        &self.bars
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = ScoreError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}
