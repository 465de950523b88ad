//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{BarSeries, Timeframe};

/// Contract for market data adapters feeding the signal engine.
///
/// Implementations must return a series ordered strictly ascending by
/// timestamp and deduplicated last-write-wins; the engine does not
/// validate bar-interval regularity. An adapter that cannot produce any
/// bars fails with [`DataError::NoDataAvailable`] rather than returning
/// a partial series.
pub trait DataSource {
    /// Load the full bar series for a symbol at the given timeframe.
    fn load(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries, DataError>;
}
