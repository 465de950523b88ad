//! Regime-split RSI/MACD strategy.
//!
//! Classifies the market bull or bear from an SMA pair and applies a
//! different RSI/MACD rule family on each side of the split. Bear-side
//! entries can additionally be gated on post-dead-cross recovery, and an
//! optional breach-then-revert exit tightens the sell once price has
//! closed above the upper Bollinger band since entry.

use serde::{Deserialize, Serialize};
use signal_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{BarSeries, FromEnd, PositionState, Regime, Signal},
};
use signal_indicators::{IndicatorEngine, IndicatorParams, IndicatorSet};
use tracing::debug;

use crate::regime::RegimeClassifier;
use crate::stop_loss::StopLossRule;

/// Configuration for the regime-split strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeSplitConfig {
    /// Regime classifier
    pub regime: RegimeClassifier,
    /// Indicator pipeline windows
    pub indicators: IndicatorParams,
    /// RSI level counted as a dip/bottom
    pub rsi_dip: f64,
    /// RSI level that arms the bull-side exit
    pub rsi_exit: f64,
    /// Bull-side entry scan window
    pub bull_lookback: usize,
    /// Bear-side double-bottom scan window
    pub bear_lookback: usize,
    /// Arm the breach-then-revert exit
    pub band_revert_exit: bool,
    /// Bear-side dead-cross gate lookback, `None` to disable
    pub dead_cross_gate: Option<usize>,
    /// Stop-loss rule
    pub stop_loss: StopLossRule,
    /// Minimum history before any non-hold signal
    pub min_bars: usize,
}

impl Default for RegimeSplitConfig {
    fn default() -> Self {
        Self {
            regime: RegimeClassifier::sma(50, 200),
            indicators: IndicatorParams::default(),
            rsi_dip: 25.0,
            rsi_exit: 72.0,
            bull_lookback: 25,
            bear_lookback: 100,
            band_revert_exit: false,
            dead_cross_gate: None,
            stop_loss: StopLossRule::FixedFraction { fraction: 0.016942 },
            min_bars: 200,
        }
    }
}

impl StrategyConfig for RegimeSplitConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.bull_lookback == 0 || self.bear_lookback == 0 {
            return Err(StrategyError::InvalidConfig(
                "Lookback windows must be greater than 0".into(),
            ));
        }
        if self.min_bars < self.regime.long_window {
            return Err(StrategyError::InvalidConfig(
                "Minimum bars must cover the regime long window".into(),
            ));
        }
        if let Some(lookback) = self.dead_cross_gate {
            if lookback == 0 {
                return Err(StrategyError::InvalidConfig(
                    "Dead-cross gate lookback must be greater than 0".into(),
                ));
            }
        }
        let p = &self.indicators;
        if p.rsi_window == 0
            || p.macd_fast == 0
            || p.macd_signal == 0
            || p.macd_fast >= p.macd_slow
            || p.bb_window < 2
            || p.bb_std_mult <= 0.0
            || p.volume_window == 0
        {
            return Err(StrategyError::InvalidConfig(
                "Invalid indicator windows".into(),
            ));
        }
        self.regime.validate()?;
        self.stop_loss.validate()
    }
}

/// At least two strict local minima at or below `threshold`.
///
/// A local minimum is a value strictly lower than both neighbors;
/// endpoints never qualify. NaN entries never count.
pub fn has_double_bottom(values: &[f64], threshold: f64) -> bool {
    let mut bottoms = 0;
    for i in 1..values.len().saturating_sub(1) {
        let v = values[i];
        if v <= threshold && v < values[i - 1] && v < values[i + 1] {
            bottoms += 1;
            if bottoms >= 2 {
                return true;
            }
        }
    }
    false
}

/// Regime-split RSI/MACD strategy.
pub struct RegimeSplit {
    config: RegimeSplitConfig,
    engine: IndicatorEngine,
}

impl RegimeSplit {
    /// Create a new regime-split strategy.
    pub fn new(config: RegimeSplitConfig) -> Self {
        let engine = IndicatorEngine::new(config.indicators.clone());
        Self { config, engine }
    }

    fn decide_entry(&self, series: &BarSeries, set: &IndicatorSet, regime: Regime) -> Signal {
        match regime {
            Regime::Bull => self.bull_entry(set),
            Regime::Bear => self.bear_entry(series, set),
        }
    }

    fn bull_entry(&self, set: &IndicatorSet) -> Signal {
        let n = set.len();
        let start = n.saturating_sub(self.config.bull_lookback);

        let min_rsi = set.rsi[start..]
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::INFINITY, f64::min);
        let hist_was_positive = set.macd_histogram[start..].iter().any(|&h| h > 0.0);
        let hist_rising = match (
            set.macd_histogram.value_from_end(0),
            set.macd_histogram.value_from_end(1),
        ) {
            (Some(last), Some(prev)) => last > prev,
            _ => false,
        };

        debug!(min_rsi, hist_was_positive, hist_rising, "bull entry scan");
        if min_rsi.floor() <= self.config.rsi_dip && hist_was_positive && hist_rising {
            return Signal::buy(
                Some(Regime::Bull),
                format!(
                    "bull regime: RSI dipped to {:.2} with MACD histogram turning up",
                    min_rsi
                ),
            );
        }
        Signal::hold().with_regime(Some(Regime::Bull))
    }

    fn bear_entry(&self, series: &BarSeries, set: &IndicatorSet) -> Signal {
        if let Some(lookback) = self.config.dead_cross_gate {
            if !self.config.regime.slope_recovered(series, lookback) {
                return Signal::hold_because(
                    "bear regime: short average has not turned up since the dead cross",
                )
                .with_regime(Some(Regime::Bear));
            }
        }

        let n = set.len();
        let start = n.saturating_sub(self.config.bear_lookback);
        let hist_turned_positive = match (
            set.macd_histogram.value_from_end(0),
            set.macd_histogram.value_from_end(1),
        ) {
            (Some(last), Some(prev)) => last > 0.0 && last > prev,
            _ => false,
        };

        if has_double_bottom(&set.rsi[start..], self.config.rsi_dip) && hist_turned_positive {
            return Signal::buy(
                Some(Regime::Bear),
                "bear regime: RSI double bottom with MACD histogram turning positive",
            );
        }
        Signal::hold().with_regime(Some(Regime::Bear))
    }

    fn decide_exit(
        &self,
        series: &BarSeries,
        set: &IndicatorSet,
        regime: Regime,
        entry_time: i64,
        entry_price: f64,
    ) -> Signal {
        if let Some(threshold) = self.config.stop_loss.breach(series, entry_time, entry_price) {
            return Signal::sell(
                Some(regime),
                format!("stop loss: close below threshold {:.4}", threshold),
            );
        }
        if series.bars_after(entry_time) < 2 {
            return Signal::hold_because("insufficient data since entry")
                .with_regime(Some(regime));
        }

        if self.config.band_revert_exit {
            if let Some(signal) = self.revert_exit(series, set, regime, entry_time) {
                return signal;
            }
        }

        match regime {
            Regime::Bull => self.bull_exit(series, set, entry_time),
            Regime::Bear => self.bear_exit(series, set),
        }
    }

    /// Once any post-entry close has pierced the upper band, sell as soon
    /// as close falls back under the band midline, skipping the
    /// regime-specific exit for that cycle.
    fn revert_exit(
        &self,
        series: &BarSeries,
        set: &IndicatorSet,
        regime: Regime,
        entry_time: i64,
    ) -> Option<Signal> {
        let n = set.len();
        let start = series.first_index_at_or_after(entry_time + 1).unwrap_or(n);
        let breached = (start..n).any(|i| {
            series
                .get(i)
                .map_or(false, |bar| bar.close > set.bb_upper[i])
        });
        if !breached {
            return None;
        }

        let close = series.close_from_end(0)?;
        let midline = set.bb_middle.value_from_end(0)?;
        if close < midline {
            return Some(Signal::sell(
                Some(regime),
                format!(
                    "upper band breach reverted: close {:.4} under band midline {:.4}",
                    close, midline
                ),
            ));
        }
        None
    }

    fn bull_exit(&self, series: &BarSeries, set: &IndicatorSet, entry_time: i64) -> Signal {
        let n = set.len();
        let start = series.first_index_at_or_after(entry_time + 1).unwrap_or(n);
        let rsi_spiked = set.rsi[start..].iter().any(|&v| v > self.config.rsi_exit);

        let was_at_or_above = set
            .macd
            .value_from_end(1)
            .zip(set.macd_signal.value_from_end(1))
            .map_or(false, |(m, s)| m >= s);
        let now_below = set
            .macd
            .value_from_end(0)
            .zip(set.macd_signal.value_from_end(0))
            .map_or(false, |(m, s)| m < s);

        if rsi_spiked && was_at_or_above && now_below {
            return Signal::sell(
                Some(Regime::Bull),
                format!(
                    "bull regime: RSI exceeded {} since entry and MACD crossed below its signal",
                    self.config.rsi_exit
                ),
            );
        }
        Signal::hold().with_regime(Some(Regime::Bull))
    }

    fn bear_exit(&self, series: &BarSeries, set: &IndicatorSet) -> Signal {
        let at_upper_band = series
            .bar_from_end(1)
            .zip(set.bb_upper.value_from_end(1))
            .map_or(false, |(bar, upper)| bar.close >= upper);
        let elevated_volume = series
            .bar_from_end(1)
            .zip(set.volume_sma.value_from_end(1))
            .map_or(false, |(bar, avg)| bar.volume > avg);

        if at_upper_band && elevated_volume {
            return Signal::sell(
                Some(Regime::Bear),
                "bear regime: close at upper band on elevated volume",
            );
        }
        Signal::hold().with_regime(Some(Regime::Bear))
    }
}

impl Strategy for RegimeSplit {
    fn name(&self) -> &str {
        "Regime Split"
    }

    fn description(&self) -> &str {
        "RSI/MACD rules split by bull/bear regime, with optional revert exit and dead-cross gate"
    }

    fn min_bars(&self) -> usize {
        self.config.min_bars
    }

    fn decide(&self, series: &BarSeries, position: &PositionState) -> Signal {
        if series.len() < self.config.min_bars {
            return Signal::hold_because(format!(
                "insufficient data: need {} bars, have {}",
                self.config.min_bars,
                series.len()
            ));
        }
        let Some(regime) = self.config.regime.classify(series) else {
            return Signal::hold_because("insufficient history for regime classification");
        };
        let set = self.engine.compute(series);

        if position.is_holding {
            let Some((entry_time, entry_price)) = position.entry() else {
                return Signal::hold_because("holding without entry details")
                    .with_regime(Some(regime));
            };
            self.decide_exit(series, &set, regime, entry_time, entry_price)
        } else {
            self.decide_entry(series, &set, regime)
        }
    }
}
