//! Strategy variants for the signal engine.
//!
//! Each variant is a pure rule set over a bar series and the caller's
//! position state: it recommends buy/sell/hold and never mutates
//! anything. Variants are selected and parametrized through the
//! [`VariantRegistry`].

pub mod band_breakout;
pub mod ema_crossover;
pub mod regime;
pub mod regime_split;
pub mod registry;
pub mod stop_loss;

pub use band_breakout::{BandBreakout, BandBreakoutConfig};
pub use ema_crossover::{EmaCrossover, EmaCrossoverConfig};
pub use regime::{MaKind, RegimeClassifier};
pub use regime_split::{has_double_bottom, RegimeSplit, RegimeSplitConfig};
pub use registry::{VariantInfo, VariantRegistry};
pub use stop_loss::StopLossRule;
