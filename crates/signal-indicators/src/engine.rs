//! Indicator engine: computes the full derived-series pipeline for a bar
//! series in one call.

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, MultiOutputIndicator};
use signal_core::types::BarSeries;

use crate::momentum::{Macd, Rsi};
use crate::moving_average::Sma;
use crate::volatility::BollingerBands;

/// Windows and multipliers for the standard pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_window: usize,
    pub bb_std_mult: f64,
    pub volume_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_window: 20,
            bb_std_mult: 2.0,
            volume_window: 20,
        }
    }
}

/// All derived series for one bar series, index-aligned with it.
/// Undefined entries are NaN per the crate-wide convention.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_histogram: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_middle: Vec<f64>,
    pub bb_lower: Vec<f64>,
    pub bb_width: Vec<f64>,
    pub volume_sma: Vec<f64>,
}

impl IndicatorSet {
    /// Number of bars the set was computed over.
    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }
}

/// Facade over the indicator primitives.
///
/// Total over any input length, including empty: a short series simply
/// yields NaN-filled columns, and the strategy layer decides what to do
/// about missing history.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Compute every derived series for the given bars.
    pub fn compute(&self, series: &BarSeries) -> IndicatorSet {
        let closes = series.closes();
        let volumes = series.volumes();
        let p = &self.params;

        let rsi = Rsi::new(p.rsi_window).calculate(&closes);
        let macd_out =
            Macd::with_periods(p.macd_fast, p.macd_slow, p.macd_signal).calculate(&closes);
        let bb_out = BollingerBands::with_params(p.bb_window, p.bb_std_mult).calculate(&closes);
        let volume_sma = Sma::new(p.volume_window).calculate(&volumes);

        IndicatorSet {
            rsi,
            macd: macd_out.iter().map(|o| o.macd).collect(),
            macd_signal: macd_out.iter().map(|o| o.signal).collect(),
            macd_histogram: macd_out.iter().map(|o| o.histogram).collect(),
            bb_upper: bb_out.iter().map(|o| o.upper).collect(),
            bb_middle: bb_out.iter().map(|o| o.middle).collect(),
            bb_lower: bb_out.iter().map(|o| o.lower).collect(),
            bb_width: bb_out.iter().map(|o| o.width).collect(),
            volume_sma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Bar, Timeframe};

    fn series_from_closes(closes: &[f64]) -> BarSeries {
        let mut series = BarSeries::new("TEST".to_string(), Timeframe::Minute15);
        for (i, &close) in closes.iter().enumerate() {
            series.push(Bar::new(
                i as i64 * 900_000,
                close,
                close + 1.0,
                close - 1.0,
                close,
                1000.0,
            ));
        }
        series
    }

    #[test]
    fn test_engine_alignment() {
        let engine = IndicatorEngine::default();
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let set = engine.compute(&series_from_closes(&closes));

        assert_eq!(set.len(), 60);
        assert_eq!(set.rsi.len(), 60);
        assert_eq!(set.macd_histogram.len(), 60);
        assert_eq!(set.bb_lower.len(), 60);
        assert_eq!(set.volume_sma.len(), 60);

        // Defaults: RSI from index 14, Bollinger from 19, histogram from 33.
        assert!(set.rsi[13].is_nan());
        assert!(!set.rsi[14].is_nan());
        assert!(set.bb_middle[18].is_nan());
        assert!(!set.bb_middle[19].is_nan());
        assert!(set.macd_histogram[32].is_nan());
        assert!(!set.macd_histogram[33].is_nan());
    }

    #[test]
    fn test_engine_empty_series() {
        let engine = IndicatorEngine::default();
        let set = engine.compute(&series_from_closes(&[]));

        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_engine_short_series_is_all_nan() {
        let engine = IndicatorEngine::default();
        let set = engine.compute(&series_from_closes(&[100.0, 101.0, 102.0]));

        assert_eq!(set.len(), 3);
        assert!(set.rsi.iter().all(|v| v.is_nan()));
        assert!(set.bb_upper.iter().all(|v| v.is_nan()));
        assert!(set.macd.iter().all(|v| v.is_nan()));
    }
}
