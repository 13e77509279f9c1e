//! Bollinger Bands indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// Middle band and the two outer bands at the last bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerReading {
    pub sma: f64,
    pub upper_band: f64,
    pub lower_band: f64,
}

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// StdDev is the sample standard deviation of the window's closes.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    /// Sample standard deviation. A single value has no spread.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerReading;

    fn name(&self) -> &'static str {
        "Bollinger Bands"
    }

    fn min_periods(&self) -> usize {
        self.period.max(1)
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<BollingerReading> {
        if self.period == 0 || bars.len() < self.period {
            return None;
        }

        let closes: Vec<f64> = bars[bars.len() - self.period..]
            .iter()
            .map(|b| b.close)
            .collect();

        let middle = closes.iter().sum::<f64>() / self.period as f64;
        let spread = self.std_dev_multiplier * Self::std_dev(&closes, middle);

        Some(BollingerReading {
            sma: middle,
            upper_band: middle + spread,
            lower_band: middle - spread,
        })
    }
}
