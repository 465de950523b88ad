//! Market data adapters.
//!
//! The engine consumes a [`BarSeries`](signal_core::types::BarSeries)
//! through the [`DataSource`](signal_core::traits::DataSource) trait;
//! this crate provides the CSV-backed implementation used for
//! historical runs.

mod csv_source;

pub use csv_source::{parse_timestamp, read_series, CsvSource};

use signal_core::error::DataError;
use signal_core::types::{BarSeries, Timeframe};

/// Load a bar series from a CSV file.
pub fn load_csv(path: &str, symbol: &str, timeframe: Timeframe) -> Result<BarSeries, DataError> {
    let source = CsvSource::new(path)?;
    source.load_series(symbol, timeframe)
}
