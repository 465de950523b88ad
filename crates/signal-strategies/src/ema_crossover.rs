//! EMA crossover strategy family.
//!
//! Buys when the fast EMA crossed above the slow EMA between the bars
//! three-back and two-back, exits when a faster EMA pair inverts after
//! entry. Variants differ only in exit pair and stop-loss rule.

use serde::{Deserialize, Serialize};
use signal_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{BarSeries, FromEnd, PositionState, Regime, Signal},
};
use signal_indicators::Ema;
use tracing::debug;

use crate::regime::RegimeClassifier;
use crate::stop_loss::StopLossRule;

/// Configuration for the EMA crossover strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaCrossoverConfig {
    /// Fast EMA span for the entry cross
    pub buy_fast_span: usize,
    /// Slow EMA span for the entry cross
    pub buy_slow_span: usize,
    /// Fast EMA span for the exit comparison
    pub exit_fast_span: usize,
    /// Slow EMA span for the exit comparison
    pub exit_slow_span: usize,
    /// Stop-loss rule
    pub stop_loss: StopLossRule,
    /// Bear-regime dead-cross gate lookback, `None` to disable
    pub dead_cross_gate: Option<usize>,
    /// Regime classifier, required when the gate is enabled
    pub regime: Option<RegimeClassifier>,
    /// Minimum history before any non-hold signal
    pub min_bars: usize,
}

impl Default for EmaCrossoverConfig {
    fn default() -> Self {
        Self {
            buy_fast_span: 5,
            buy_slow_span: 20,
            exit_fast_span: 5,
            exit_slow_span: 10,
            stop_loss: StopLossRule::FixedFraction { fraction: 0.005 },
            dead_cross_gate: None,
            regime: None,
            min_bars: 200,
        }
    }
}

impl StrategyConfig for EmaCrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.buy_fast_span == 0 || self.buy_fast_span >= self.buy_slow_span {
            return Err(StrategyError::InvalidConfig(
                "Entry fast span must be positive and less than the slow span".into(),
            ));
        }
        if self.exit_fast_span == 0 || self.exit_fast_span >= self.exit_slow_span {
            return Err(StrategyError::InvalidConfig(
                "Exit fast span must be positive and less than the slow span".into(),
            ));
        }
        if self.dead_cross_gate.is_some() && self.regime.is_none() {
            return Err(StrategyError::InvalidConfig(
                "Dead-cross gate requires a regime classifier".into(),
            ));
        }
        if let Some(regime) = &self.regime {
            regime.validate()?;
        }
        self.stop_loss.validate()
    }
}

/// EMA crossover strategy.
pub struct EmaCrossover {
    config: EmaCrossoverConfig,
}

impl EmaCrossover {
    /// Create a new EMA crossover strategy.
    pub fn new(config: EmaCrossoverConfig) -> Self {
        Self { config }
    }

    fn decide_entry(&self, series: &BarSeries, regime: Option<Regime>) -> Signal {
        if let (Some(lookback), Some(classifier)) =
            (self.config.dead_cross_gate, self.config.regime.as_ref())
        {
            if regime == Some(Regime::Bear) && !classifier.slope_recovered(series, lookback) {
                return Signal::hold_because(
                    "bear regime: short average has not turned up since the dead cross",
                )
                .with_regime(regime);
            }
        }

        let closes = series.closes();
        let fast = Ema::new(self.config.buy_fast_span).calculate(&closes);
        let slow = Ema::new(self.config.buy_slow_span).calculate(&closes);

        let was_below = fast
            .value_from_end(2)
            .zip(slow.value_from_end(2))
            .map_or(false, |(f, s)| f < s);
        let now_at_or_above = fast
            .value_from_end(1)
            .zip(slow.value_from_end(1))
            .map_or(false, |(f, s)| f >= s);

        if was_below && now_at_or_above {
            debug!(
                fast = ?fast.value_from_end(1),
                slow = ?slow.value_from_end(1),
                "entry crossover"
            );
            return Signal::buy(
                regime,
                format!(
                    "EMA{} crossed above EMA{}",
                    self.config.buy_fast_span, self.config.buy_slow_span
                ),
            );
        }
        Signal::hold().with_regime(regime)
    }

    fn decide_exit(
        &self,
        series: &BarSeries,
        regime: Option<Regime>,
        entry_time: i64,
        entry_price: f64,
    ) -> Signal {
        if let Some(threshold) = self.config.stop_loss.breach(series, entry_time, entry_price) {
            return Signal::sell(
                regime,
                format!("stop loss: close below threshold {:.4}", threshold),
            );
        }
        if series.bars_after(entry_time) < 2 {
            return Signal::hold_because("insufficient data since entry").with_regime(regime);
        }

        let closes = series.closes();
        let fast = Ema::new(self.config.exit_fast_span).calculate(&closes);
        let slow = Ema::new(self.config.exit_slow_span).calculate(&closes);

        let inverted = fast
            .value_from_end(0)
            .zip(slow.value_from_end(0))
            .map_or(false, |(f, s)| f < s);
        if inverted {
            return Signal::sell(
                regime,
                format!(
                    "EMA{} below EMA{}",
                    self.config.exit_fast_span, self.config.exit_slow_span
                ),
            );
        }
        Signal::hold().with_regime(regime)
    }
}

impl Strategy for EmaCrossover {
    fn name(&self) -> &str {
        "EMA Crossover"
    }

    fn description(&self) -> &str {
        "Buys fast/slow EMA cross-ups, exits when a faster EMA pair inverts"
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
        let regime = self
            .config
            .regime
            .as_ref()
            .and_then(|classifier| classifier.classify(series));

        if position.is_holding {
            let Some((entry_time, entry_price)) = position.entry() else {
                return Signal::hold_because("holding without entry details").with_regime(regime);
            };
            self.decide_exit(series, regime, entry_time, entry_price)
        } else {
            self.decide_entry(series, regime)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Action, Bar, Timeframe};

    fn series_from(closes: &[f64]) -> BarSeries {
        let mut series = BarSeries::new("KRW-DOGE".to_string(), Timeframe::Minute15);
        for (i, &close) in closes.iter().enumerate() {
            series.push(Bar::new(
                i as i64 * 60_000,
                close,
                close + 1.0,
                close - 1.0,
                close,
                1000.0,
            ));
        }
        series
    }

    fn decline_then_rise(rise_bars: usize) -> Vec<f64> {
        let mut closes: Vec<f64> = (0..200).map(|i| 100.0 - 0.2 * i as f64).collect();
        let base = closes[199];
        for j in 1..=rise_bars {
            closes.push(base + 1.5 * j as f64);
        }
        closes
    }

    #[test]
    fn test_buy_on_cross_between_three_back_and_two_back() {
        let strategy = EmaCrossover::new(EmaCrossoverConfig::default());
        // Four rising bars put the EMA5/EMA20 cross exactly one bar back.
        let series = series_from(&decline_then_rise(4));

        let signal = strategy.decide(&series, &PositionState::flat());
        assert_eq!(signal.action, Action::Buy);
        assert!(signal.message.contains("EMA5 crossed above EMA20"));
    }

    #[test]
    fn test_no_buy_when_cross_is_older() {
        let strategy = EmaCrossover::new(EmaCrossoverConfig::default());
        // One extra bar pushes the cross two bars back: missed.
        let series = series_from(&decline_then_rise(5));

        let signal = strategy.decide(&series, &PositionState::flat());
        assert!(signal.is_hold());
    }

    #[test]
    fn test_sell_when_exit_pair_inverts() {
        let strategy = EmaCrossover::new(EmaCrossoverConfig::default());
        let mut closes = vec![100.0; 200];
        closes.extend([99.0, 98.0, 97.0, 96.0, 95.0]);
        let series = series_from(&closes);

        let position = PositionState::holding(201 * 60_000, 90.0);
        let signal = strategy.decide(&series, &position);

        assert_eq!(signal.action, Action::Sell);
        assert!(signal.message.contains("EMA5 below EMA10"));
    }

    #[test]
    fn test_exit_needs_bars_since_entry() {
        let strategy = EmaCrossover::new(EmaCrossoverConfig::default());
        let mut closes = vec![100.0; 200];
        closes.extend([99.0, 98.0, 97.0, 96.0, 95.0]);
        let series = series_from(&closes);

        let position = PositionState::holding(204 * 60_000, 90.0);
        let signal = strategy.decide(&series, &position);

        assert!(signal.is_hold());
        assert!(signal.message.contains("since entry"));
    }

    #[test]
    fn test_entry_open_floor_stop() {
        let config = EmaCrossoverConfig {
            stop_loss: StopLossRule::EntryOpenFloor { lookback: 3 },
            ..Default::default()
        };
        let strategy = EmaCrossover::new(config);

        let mut series = BarSeries::new("KRW-DOGE".to_string(), Timeframe::Minute15);
        for i in 0..208 {
            // Three bars before entry carry the floor opens; the last
            // close falls under their minimum (99.0).
            let open = match i {
                202 => 99.5,
                203 => 99.0,
                204 => 99.2,
                _ => 100.0,
            };
            let close = if i == 207 { 98.5 } else { 100.0 };
            series.push(Bar::new(
                i as i64 * 60_000,
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                1000.0,
            ));
        }

        let position = PositionState::holding(205 * 60_000, 100.0);
        let signal = strategy.decide(&series, &position);

        assert_eq!(signal.action, Action::Sell);
        assert!(signal.message.contains("stop loss"));
    }

    #[test]
    fn test_dead_cross_gate_refuses_unrecovered_cross() {
        // Slow grind down, then a rise spread thinly enough that the
        // EMA5/EMA20 pair crosses while the SMA20 slope never turns
        // positive. The gated variant refuses what the plain one takes.
        let mut closes: Vec<f64> = (0..210).map(|i| 400.0 - i as f64).collect();
        let base = closes[209];
        for j in 1..=5 {
            closes.push(base + 2.75 * j as f64);
        }
        closes.push(*closes.last().unwrap());
        let series = series_from(&closes);

        let gated = EmaCrossover::new(EmaCrossoverConfig {
            dead_cross_gate: Some(100),
            regime: Some(RegimeClassifier::sma(20, 200)),
            ..Default::default()
        });
        let signal = gated.decide(&series, &PositionState::flat());
        assert!(signal.is_hold());
        assert!(signal.message.contains("dead cross"));

        let ungated = EmaCrossover::new(EmaCrossoverConfig::default());
        let signal = ungated.decide(&series, &PositionState::flat());
        assert_eq!(signal.action, Action::Buy);
    }

    #[test]
    fn test_position_action_consistency() {
        let strategy = EmaCrossover::new(EmaCrossoverConfig::default());

        // Buy-shaped series while holding must not buy.
        let series = series_from(&decline_then_rise(4));
        let signal = strategy.decide(&series, &PositionState::holding(100 * 60_000, 50.0));
        assert_ne!(signal.action, Action::Buy);

        // Declining series (exit-shaped) while flat must not sell.
        let mut closes = vec![100.0; 200];
        closes.extend([99.0, 98.0, 97.0, 96.0, 95.0]);
        let signal = strategy.decide(&series_from(&closes), &PositionState::flat());
        assert_ne!(signal.action, Action::Sell);
    }

    #[test]
    fn test_short_series_holds() {
        let strategy = EmaCrossover::new(EmaCrossoverConfig::default());
        let series = series_from(&vec![100.0; 120]);

        for position in [PositionState::flat(), PositionState::holding(0, 100.0)] {
            let signal = strategy.decide(&series, &position);
            assert!(signal.is_hold());
            assert!(signal.message.contains("insufficient data"));
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(EmaCrossoverConfig::default().validate().is_ok());

        let config = EmaCrossoverConfig {
            buy_fast_span: 20,
            buy_slow_span: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EmaCrossoverConfig {
            dead_cross_gate: Some(100),
            regime: None,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
