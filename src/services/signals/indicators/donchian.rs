//! Donchian Channel indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// Channel bounds at the last bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonchianReading {
    pub upper: f64,
    pub lower: f64,
}

/// Donchian Channel.
///
/// - Upper channel: highest high over the period
/// - Lower channel: lowest low over the period
///
/// By default the window ends at the last bar. With `exclude_current` it
/// ends one bar earlier, so the last close can break out of it.
pub struct Donchian {
    period: usize,
    exclude_current: bool,
}

impl Default for Donchian {
    fn default() -> Self {
        Self {
            period: 20,
            exclude_current: false,
        }
    }
}

impl Donchian {
    pub fn new(period: usize, exclude_current: bool) -> Self {
        Self {
            period,
            exclude_current,
        }
    }
}

impl Indicator for Donchian {
    type Output = DonchianReading;

    fn name(&self) -> &'static str {
        "Donchian Channel"
    }

    fn min_periods(&self) -> usize {
        self.period.max(1) + usize::from(self.exclude_current)
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<DonchianReading> {
        if self.period == 0 || bars.len() < self.min_periods() {
            return None;
        }

        let end = bars.len() - usize::from(self.exclude_current);
        let window = &bars[end - self.period..end];

        Some(DonchianReading {
            upper: window
                .iter()
                .map(|b| b.high)
                .fold(f64::NEG_INFINITY, f64::max),
            lower: window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
        })
    }
}
