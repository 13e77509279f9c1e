//! Volume Weighted Average Price (VWAP) indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// VWAP (Volume Weighted Average Price) indicator.
///
/// Cumulative over the whole window:
/// VWAP = Σ(TP * Volume) / Σ(Volume), TP = (high + low + close) / 3
///
/// A window that traded no volume reads the last close.
#[derive(Default)]
pub struct Vwap;

impl Indicator for Vwap {
    type Output = f64;

    fn name(&self) -> &'static str {
        "VWAP"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, bars: &[PriceBar]) -> Option<f64> {
        let last = bars.last()?;

        let (cum_tp_vol, cum_vol) = bars.iter().fold((0.0, 0.0), |(tp_vol, vol), bar| {
            let volume = bar.volume as f64;
            (tp_vol + bar.typical_price() * volume, vol + volume)
        });

        if cum_vol > 0.0 {
            Some(cum_tp_vol / cum_vol)
        } else {
            Some(last.close)
        }
    }
}
