//! Simple Moving Average (SMA) indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// SMA (Simple Moving Average) indicator.
///
/// Arithmetic mean of the closing price over the last `period` bars.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Mean of the last `period` values.
pub fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

impl Indicator for Sma {
    type Output = f64;

    fn name(&self) -> &'static str {
        "SMA"
    }

    fn min_periods(&self) -> usize {
        self.period.max(1)
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<f64> {
        if self.period == 0 || bars.len() < self.period {
            return None;
        }

        let sum: f64 = bars
            .iter()
            .rev()
            .take(self.period)
            .map(|b| b.close)
            .sum();

        Some(sum / self.period as f64)
    }
}
