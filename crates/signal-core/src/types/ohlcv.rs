//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Timeframe;

/// Compact OHLCV bar. Uses f64 for fast indicator calculations.
///
/// Timestamps are epoch milliseconds in exchange-local time; intra-day
/// sequencing only relies on them being strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check if the bar is bullish (close strictly above open).
    ///
    /// Decision rules that accept a doji as bullish compare
    /// `close >= open` explicitly instead.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the bar is bearish (close strictly below open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Bar body size (absolute difference between open and close).
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }
}

/// End-relative access into a finite sequence: `value_from_end(0)` is the
/// last element, `value_from_end(1)` the one before it, and so on.
/// Returns `None` when the sequence is shorter than `k + 1`, which turns
/// the ad-hoc `[-2]` / `[-3]` indexing of the decision rules into a
/// checked operation.
pub trait FromEnd {
    type Item;

    /// Value at offset `k` from the end, `None` if out of range.
    fn value_from_end(&self, k: usize) -> Option<Self::Item>;
}

impl FromEnd for [f64] {
    type Item = f64;

    fn value_from_end(&self, k: usize) -> Option<f64> {
        if k < self.len() {
            Some(self[self.len() - 1 - k])
        } else {
            None
        }
    }
}

impl FromEnd for Vec<f64> {
    type Item = f64;

    fn value_from_end(&self, k: usize) -> Option<f64> {
        self.as_slice().value_from_end(k)
    }
}

/// Time-series container for bars, ordered strictly ascending by
/// timestamp and deduplicated (last write wins).
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: VecDeque<Bar>,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: String, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            timeframe,
            bars: VecDeque::new(),
        }
    }

    /// Push a new bar, keeping the series strictly ascending.
    ///
    /// A bar carrying the same timestamp as the current last bar replaces
    /// it (the exchange re-publishes the forming candle); a bar older
    /// than the last one is dropped.
    pub fn push(&mut self, bar: Bar) {
        if let Some(last) = self.bars.back_mut() {
            if bar.timestamp == last.timestamp {
                *last = bar;
                return;
            }
            if bar.timestamp < last.timestamp {
                return;
            }
        }
        self.bars.push_back(bar);
    }

    /// Push multiple bars.
    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) {
        for bar in bars {
            self.push(bar);
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Bar at offset `k` from the end (0 = most recent).
    pub fn bar_from_end(&self, k: usize) -> Option<&Bar> {
        if k < self.bars.len() {
            self.bars.get(self.bars.len() - 1 - k)
        } else {
            None
        }
    }

    /// Close at offset `k` from the end.
    pub fn close_from_end(&self, k: usize) -> Option<f64> {
        self.bar_from_end(k).map(|b| b.close)
    }

    /// Number of bars with a timestamp strictly after `timestamp`.
    ///
    /// Used by sell rules that require a minimum amount of history since
    /// the position was entered. Bars are ordered, so scan from the back.
    pub fn bars_after(&self, timestamp: i64) -> usize {
        self.bars
            .iter()
            .rev()
            .take_while(|b| b.timestamp > timestamp)
            .count()
    }

    /// Index of the first bar with a timestamp at or after `timestamp`,
    /// `None` if every bar is older.
    pub fn first_index_at_or_after(&self, timestamp: i64) -> Option<usize> {
        self.bars.iter().position(|b| b.timestamp >= timestamp)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract open prices as a vector.
    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

impl FromIterator<Bar> for BarSeries {
    fn from_iter<T: IntoIterator<Item = Bar>>(iter: T) -> Self {
        let mut series = Self::new(String::new(), Timeframe::default());
        series.extend(iter);
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_candle_shape() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
        assert!((bar.body() - 5.0).abs() < 1e-10);

        let doji = Bar::new(2000, 100.0, 101.0, 99.0, 100.0, 500.0);
        assert!(!doji.is_bullish());
        assert!(!doji.is_bearish());
    }

    #[test]
    fn test_series_dedup_last_wins() {
        let mut series = BarSeries::new("KRW-DOGE".to_string(), Timeframe::Minute5);
        series.push(Bar::new(1, 1.0, 1.0, 1.0, 1.0, 10.0));
        series.push(Bar::new(2, 2.0, 2.0, 2.0, 2.0, 20.0));
        // Re-published candle for the same timestamp replaces the old one.
        series.push(Bar::new(2, 2.0, 3.0, 2.0, 2.5, 25.0));

        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 2.5);
        assert_eq!(series.last().unwrap().volume, 25.0);
    }

    #[test]
    fn test_series_drops_out_of_order() {
        let mut series = BarSeries::new("KRW-DOGE".to_string(), Timeframe::Minute5);
        series.push(Bar::new(10, 1.0, 1.0, 1.0, 1.0, 1.0));
        series.push(Bar::new(5, 9.0, 9.0, 9.0, 9.0, 9.0));

        assert_eq!(series.len(), 1);
        assert_eq!(series.last().unwrap().timestamp, 10);
    }

    #[test]
    fn test_from_end_accessors() {
        let mut series = BarSeries::new("TEST".to_string(), Timeframe::Minute15);
        for i in 0..5 {
            let price = 100.0 + i as f64;
            series.push(Bar::new(i, price, price, price, price, 1.0));
        }

        assert_eq!(series.bar_from_end(0).unwrap().close, 104.0);
        assert_eq!(series.bar_from_end(4).unwrap().close, 100.0);
        assert!(series.bar_from_end(5).is_none());

        assert_eq!(series.close_from_end(1), Some(103.0));

        let values = vec![1.0, 2.0, 3.0];
        assert_eq!(values.value_from_end(0), Some(3.0));
        assert_eq!(values.value_from_end(2), Some(1.0));
        assert_eq!(values.value_from_end(3), None);
    }

    #[test]
    fn test_bars_after() {
        let mut series = BarSeries::new("TEST".to_string(), Timeframe::Minute15);
        for i in 0..10 {
            series.push(Bar::new(i * 1000, 1.0, 1.0, 1.0, 1.0, 1.0));
        }

        assert_eq!(series.bars_after(6000), 3);
        assert_eq!(series.bars_after(6500), 3);
        assert_eq!(series.bars_after(9000), 0);
        assert_eq!(series.bars_after(-1), 10);
        assert_eq!(series.first_index_at_or_after(6000), Some(6));
        assert_eq!(series.first_index_at_or_after(20_000), None);
    }

    #[test]
    fn test_series_extractions() {
        let mut series = BarSeries::new("TEST".to_string(), Timeframe::Minute15);
        series.push(Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0));

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1000.0, 2000.0]);
        assert_eq!(series.opens(), vec![100.0, 100.5]);
    }
}
