//! CSV market data source.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use signal_core::error::DataError;
use signal_core::types::{Bar, BarSeries, Timeframe};

/// CSV record format. Fields are optional so a missing column reports
/// which one was absent instead of an opaque parse error.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp", default)]
    date: Option<String>,
    #[serde(alias = "Open", default)]
    open: Option<f64>,
    #[serde(alias = "High", default)]
    high: Option<f64>,
    #[serde(alias = "Low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "Adj Close", default)]
    close: Option<f64>,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

impl CsvRecord {
    fn require<T>(value: Option<T>, field: &str) -> Result<T, DataError> {
        value.ok_or_else(|| DataError::MissingField(field.to_string()))
    }
}

/// CSV data source for historical bars.
///
/// Rows are sorted ascending by timestamp; duplicate timestamps keep the
/// last occurrence in file order.
pub struct CsvSource {
    path: String,
}

impl CsvSource {
    /// Create a new CSV source.
    pub fn new(path: &str) -> Result<Self, DataError> {
        if !Path::new(path).exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_string(),
        })
    }

    /// Load a bar series from the file.
    pub fn load_series(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries, DataError> {
        let reader = std::fs::File::open(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;
        let series = read_series(reader, symbol, timeframe)?;
        debug!(path = %self.path, bars = series.len(), "loaded csv series");
        Ok(series)
    }
}

impl signal_core::traits::DataSource for CsvSource {
    fn load(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries, DataError> {
        self.load_series(symbol, timeframe)
    }
}

/// Parse bars from any CSV reader into an ordered, deduplicated series.
pub fn read_series<R: Read>(
    reader: R,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<BarSeries, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut bars = Vec::new();
    for result in csv_reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        let date = CsvRecord::require(record.date, "date")?;
        let bar = Bar::new(
            parse_timestamp(&date)?,
            CsvRecord::require(record.open, "open")?,
            CsvRecord::require(record.high, "high")?,
            CsvRecord::require(record.low, "low")?,
            CsvRecord::require(record.close, "close")?,
            CsvRecord::require(record.volume, "volume")?,
        );
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(DataError::NoDataAvailable);
    }

    // Stable sort keeps file order for equal timestamps, and the series
    // push replaces repeated timestamps, so the last occurrence wins.
    bars.sort_by_key(|b| b.timestamp);
    let mut series = BarSeries::new(symbol.to_string(), timeframe);
    series.extend(bars);
    Ok(series)
}

/// Parse the timestamp formats seen in exchange exports.
pub fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Epoch seconds or milliseconds, by magnitude.
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
