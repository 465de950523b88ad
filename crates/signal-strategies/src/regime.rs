//! Market regime classification from a moving-average comparison.

use serde::{Deserialize, Serialize};
use signal_core::error::StrategyError;
use signal_core::traits::Indicator;
use signal_core::types::{BarSeries, Regime};
use signal_indicators::{diff, Ema, Sma};

/// Which moving average family the classifier compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaKind {
    Sma,
    Ema,
}

/// Point-in-time bull/bear classifier.
///
/// Bull iff the short-window average is above the long-window average at
/// the last bar. No memory: the label is recomputed on every call and
/// can flip between consecutive evaluations. Variants that need
/// "once-flipped" semantics use [`slope_recovered`](Self::slope_recovered)
/// over a bounded recent window instead of a single snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeClassifier {
    pub kind: MaKind,
    pub short_window: usize,
    pub long_window: usize,
}

impl RegimeClassifier {
    /// SMA-based classifier (e.g. 50/200).
    pub fn sma(short_window: usize, long_window: usize) -> Self {
        Self {
            kind: MaKind::Sma,
            short_window,
            long_window,
        }
    }

    /// EMA-based classifier (e.g. 50/200).
    pub fn ema(short_window: usize, long_window: usize) -> Self {
        Self {
            kind: MaKind::Ema,
            short_window,
            long_window,
        }
    }

    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.short_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "Regime short window must be greater than 0".into(),
            ));
        }
        if self.short_window >= self.long_window {
            return Err(StrategyError::InvalidConfig(
                "Regime short window must be less than long window".into(),
            ));
        }
        Ok(())
    }

    fn ma(&self, data: &[f64], window: usize) -> Vec<f64> {
        match self.kind {
            MaKind::Sma => Sma::new(window).calculate(data),
            MaKind::Ema => Ema::new(window).calculate(data),
        }
    }

    /// Classify the series at its most recent bar.
    ///
    /// Returns `None` while either average is still undefined. Pure and
    /// idempotent: two calls on the same series yield the same label.
    pub fn classify(&self, series: &BarSeries) -> Option<Regime> {
        let closes = series.closes();
        let short = *self.ma(&closes, self.short_window).last()?;
        let long = *self.ma(&closes, self.long_window).last()?;

        if short.is_nan() || long.is_nan() {
            return None;
        }

        Some(if short > long {
            Regime::Bull
        } else {
            Regime::Bear
        })
    }

    /// Dead-cross hysteresis guard: true when, within the trailing
    /// `lookback` bars where the short average sat below the long one,
    /// the short average's slope was positive at least once.
    ///
    /// Guards against buying into a still-falling market after a bearish
    /// cross: the market must have shown one upward twitch first.
    pub fn slope_recovered(&self, series: &BarSeries, lookback: usize) -> bool {
        let closes = series.closes();
        let short = self.ma(&closes, self.short_window);
        let long = self.ma(&closes, self.long_window);
        let slope = diff(&short);

        let start = closes.len().saturating_sub(lookback);
        (start..closes.len()).any(|i| short[i] < long[i] && slope[i] > 0.0)
    }
}
