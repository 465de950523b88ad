//! Core data types for the signal engine.

mod ohlcv;
mod position;
mod signal;
mod timeframe;

pub use ohlcv::{Bar, BarSeries, FromEnd};
pub use position::PositionState;
pub use signal::{Action, Regime, Signal};
pub use timeframe::Timeframe;
