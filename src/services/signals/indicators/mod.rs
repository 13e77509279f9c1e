//! Technical indicator implementations.

pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;

pub use bollinger::{BollingerBands, BollingerReading};
pub use donchian::{Donchian, DonchianReading};
pub use ema::Ema;
pub use macd::{Macd, MacdReading};
pub use obv::{Obv, ObvReading};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticReading};
pub use vwap::Vwap;
