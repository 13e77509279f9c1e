//! On-Balance Volume (OBV) indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// OBV at the last two bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObvReading {
    pub current: i64,
    pub previous: i64,
}

/// OBV (On-Balance Volume) indicator.
///
/// Cumulative volume starting at 0 on the first bar:
/// - If close > previous close: OBV += volume
/// - If close < previous close: OBV -= volume
#[derive(Default)]
pub struct Obv;

/// OBV at every bar.
pub fn obv_series(bars: &[PriceBar]) -> Vec<i64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut obv: i64 = 0;

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let previous = bars[i - 1].close;
            if bar.close > previous {
                obv = obv.saturating_add_unsigned(bar.volume);
            } else if bar.close < previous {
                obv = obv.saturating_sub_unsigned(bar.volume);
            }
        }
        out.push(obv);
    }

    out
}

impl Indicator for Obv {
    type Output = ObvReading;

    fn name(&self) -> &'static str {
        "OBV"
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<ObvReading> {
        if bars.len() < self.min_periods() {
            return None;
        }

        let series = obv_series(bars);
        let [.., previous, current] = series.as_slice() else {
            return None;
        };

        Some(ObvReading {
            current: *current,
            previous: *previous,
        })
    }
}
