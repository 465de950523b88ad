//! Core traits for the signal engine.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::DataSource;
pub use indicator::{Indicator, MultiOutputIndicator};
pub use strategy::{Strategy, StrategyConfig};
