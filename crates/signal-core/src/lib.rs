//! Core types and traits for the signal engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Position state as seen by the decision core
//! - Trading signals (buy / sell / hold plus a reason)
//! - Core traits for strategies, indicators and data sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{SignalError, SignalResult};
pub use types::*;
pub use traits::*;
