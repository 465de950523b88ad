//! Technical indicators for the signal engine.
//!
//! All indicators follow one alignment convention: the output has the
//! same length as the input bar series, with `f64::NAN` marking entries
//! where not enough history exists yet. This keeps every derived series
//! index-aligned with the bars it came from, so decision rules can peek
//! N bars back without bookkeeping offsets.
//!
//! Provided:
//! - Moving averages (SMA, EMA) and first-difference slopes
//! - Momentum indicators (RSI with Wilder smoothing, MACD)
//! - Volatility (Bollinger Bands)
//! - [`IndicatorEngine`], a facade computing the full pipeline in one call

pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use engine::{IndicatorEngine, IndicatorParams, IndicatorSet};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{diff, Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput};
