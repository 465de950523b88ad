//! Bollinger band breakout-reversal strategy.
//!
//! Buys when the previous bar broke down through the lower band and the
//! latest bar reversed bullish; exits when the previous bar closed
//! through the upper band.

use serde::{Deserialize, Serialize};
use signal_core::{
    error::StrategyError,
    traits::{MultiOutputIndicator, Strategy, StrategyConfig},
    types::{BarSeries, PositionState, Regime, Signal},
};
use signal_indicators::BollingerBands;
use tracing::debug;

use crate::regime::RegimeClassifier;
use crate::stop_loss::StopLossRule;

/// Configuration for the band breakout strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BandBreakoutConfig {
    /// Bollinger window
    pub bb_window: usize,
    /// Band width in standard deviations
    pub bb_std_mult: f64,
    /// Regime classifier (label only, does not gate trades)
    pub regime: RegimeClassifier,
    /// Stop-loss rule
    pub stop_loss: StopLossRule,
    /// Minimum history before any non-hold signal
    pub min_bars: usize,
}

impl Default for BandBreakoutConfig {
    fn default() -> Self {
        Self {
            bb_window: 20,
            bb_std_mult: 2.0,
            regime: RegimeClassifier::ema(50, 200),
            stop_loss: StopLossRule::FixedFraction { fraction: 0.01 },
            min_bars: 200,
        }
    }
}

impl StrategyConfig for BandBreakoutConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.bb_window < 2 {
            return Err(StrategyError::InvalidConfig(
                "Bollinger window must be at least 2".into(),
            ));
        }
        if self.bb_std_mult <= 0.0 {
            return Err(StrategyError::InvalidConfig(
                "Bollinger std multiplier must be positive".into(),
            ));
        }
        if self.min_bars < self.bb_window {
            return Err(StrategyError::InvalidConfig(
                "Minimum bars must cover the Bollinger window".into(),
            ));
        }
        self.regime.validate()?;
        self.stop_loss.validate()
    }
}

/// Band breakout strategy.
pub struct BandBreakout {
    config: BandBreakoutConfig,
}

impl BandBreakout {
    /// Create a new band breakout strategy.
    pub fn new(config: BandBreakoutConfig) -> Self {
        Self { config }
    }

    fn decide_entry(&self, series: &BarSeries, regime: Option<Regime>) -> Signal {
        let bands = BollingerBands::with_params(self.config.bb_window, self.config.bb_std_mult)
            .calculate(&series.closes());

        let (Some(prev), Some(curr)) = (series.bar_from_end(1), series.bar_from_end(0)) else {
            return Signal::hold().with_regime(regime);
        };
        let prev_lower = bands[series.len() - 2].lower;

        // NaN band values make the comparison false, which is a hold.
        if prev.is_bearish() && prev.close < prev_lower && curr.close >= curr.open {
            debug!(
                prev_close = prev.close,
                lower = prev_lower,
                "lower band breakdown followed by reversal"
            );
            return Signal::buy(
                regime,
                format!(
                    "bearish close {:.4} below lower band {:.4} followed by bullish reversal candle",
                    prev.close, prev_lower
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

        let bands = BollingerBands::with_params(self.config.bb_window, self.config.bb_std_mult)
            .calculate(&series.closes());
        let Some(prev) = series.bar_from_end(1) else {
            return Signal::hold().with_regime(regime);
        };
        let prev_upper = bands[series.len() - 2].upper;

        if prev.is_bullish() && prev.close > prev_upper {
            return Signal::sell(
                regime,
                format!(
                    "bullish close {:.4} above upper band {:.4}",
                    prev.close, prev_upper
                ),
            );
        }
        Signal::hold().with_regime(regime)
    }
}

impl Strategy for BandBreakout {
    fn name(&self) -> &str {
        "Band Breakout"
    }

    fn description(&self) -> &str {
        "Buys lower-band breakdown reversals, exits on upper-band breakouts"
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
        let regime = self.config.regime.classify(series);

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
