//! Stop-loss rules.
//!
//! The stop-loss check has precedence over every other exit condition
//! and ignores the post-entry history requirement: a breach sells
//! immediately, whatever else the indicators say that cycle.

use serde::{Deserialize, Serialize};
use signal_core::error::StrategyError;
use signal_core::types::BarSeries;

/// How the sell threshold is derived from the entry.
///
/// The fractions configured across variants differ (0.016942, 0.01,
/// 0.006942, 0.005) without a recorded rationale; each variant keeps its
/// own constant as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLossRule {
    /// Sell when close < entry_price * (1 - fraction).
    FixedFraction { fraction: f64 },
    /// Sell when close falls below the minimum open of the `lookback`
    /// bars immediately preceding entry.
    EntryOpenFloor { lookback: usize },
}

impl Default for StopLossRule {
    fn default() -> Self {
        StopLossRule::FixedFraction { fraction: 0.01 }
    }
}

impl StopLossRule {
    pub fn validate(&self) -> Result<(), StrategyError> {
        match self {
            StopLossRule::FixedFraction { fraction } => {
                if !(0.0..1.0).contains(fraction) || *fraction == 0.0 {
                    return Err(StrategyError::InvalidConfig(
                        "Stop-loss fraction must be in (0, 1)".into(),
                    ));
                }
            }
            StopLossRule::EntryOpenFloor { lookback } => {
                if *lookback == 0 {
                    return Err(StrategyError::InvalidConfig(
                        "Stop-loss open-floor lookback must be greater than 0".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Price below which the latest close triggers the stop. `None` when
    /// the rule cannot produce a threshold (no bars precede the entry).
    pub fn threshold(&self, series: &BarSeries, entry_time: i64, entry_price: f64) -> Option<f64> {
        match self {
            StopLossRule::FixedFraction { fraction } => Some(entry_price * (1.0 - fraction)),
            StopLossRule::EntryOpenFloor { lookback } => {
                let entry_idx = series
                    .first_index_at_or_after(entry_time)
                    .unwrap_or(series.len());
                if entry_idx == 0 {
                    return None;
                }
                let start = entry_idx.saturating_sub(*lookback);
                (start..entry_idx)
                    .filter_map(|i| series.get(i).map(|b| b.open))
                    .fold(None, |floor: Option<f64>, open| match floor {
                        Some(f) => Some(f.min(open)),
                        None => Some(open),
                    })
            }
        }
    }

    /// `Some(threshold)` when the latest close has breached the stop,
    /// so sell messages can report the level that tripped.
    pub fn breach(&self, series: &BarSeries, entry_time: i64, entry_price: f64) -> Option<f64> {
        let close = series.close_from_end(0)?;
        let threshold = self.threshold(series, entry_time, entry_price)?;
        (close < threshold).then_some(threshold)
    }

    /// Whether the latest close has breached the stop threshold.
    pub fn is_breached(&self, series: &BarSeries, entry_time: i64, entry_price: f64) -> bool {
        self.breach(series, entry_time, entry_price).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Bar, Timeframe};

    fn series_with_opens(opens_closes: &[(f64, f64)]) -> BarSeries {
        let mut series = BarSeries::new("TEST".to_string(), Timeframe::Minute15);
        for (i, &(open, close)) in opens_closes.iter().enumerate() {
            series.push(Bar::new(i as i64 * 1000, open, open.max(close), open.min(close), close, 1.0));
        }
        series
    }

    #[test]
    fn test_fixed_fraction_threshold() {
        let rule = StopLossRule::FixedFraction { fraction: 0.016942 };
        let series = series_with_opens(&[(100.0, 100.0)]);

        let threshold = rule.threshold(&series, 0, 100.0).unwrap();
        assert!((threshold - 98.3058).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_fraction_breach() {
        let rule = StopLossRule::FixedFraction { fraction: 0.016942 };

        // 98.2 < 98.3058: breached.
        let breached = series_with_opens(&[(100.0, 100.0), (100.0, 98.2)]);
        assert!(rule.is_breached(&breached, 0, 100.0));

        // 98.4 >= 98.3058: safe.
        let safe = series_with_opens(&[(100.0, 100.0), (100.0, 98.4)]);
        assert!(!rule.is_breached(&safe, 0, 100.0));
    }

    #[test]
    fn test_entry_open_floor() {
        let rule = StopLossRule::EntryOpenFloor { lookback: 3 };
        // Opens before entry at t=4000: 103, 101, 102 -> floor 101.
        let series = series_with_opens(&[
            (105.0, 104.0),
            (103.0, 102.0),
            (101.0, 102.0),
            (102.0, 103.0),
            (103.0, 103.5), // entry bar
            (103.5, 100.5), // close below the floor
        ]);

        assert_eq!(rule.threshold(&series, 4000, 103.5), Some(101.0));
        assert!(rule.is_breached(&series, 4000, 103.5));
    }

    #[test]
    fn test_entry_open_floor_no_history() {
        let rule = StopLossRule::EntryOpenFloor { lookback: 3 };
        let series = series_with_opens(&[(100.0, 99.0)]);

        // Entry at or before the first bar: nothing precedes it.
        assert_eq!(rule.threshold(&series, 0, 100.0), None);
        assert!(!rule.is_breached(&series, 0, 100.0));
    }

    #[test]
    fn test_validate() {
        assert!(StopLossRule::FixedFraction { fraction: 0.005 }.validate().is_ok());
        assert!(StopLossRule::FixedFraction { fraction: 0.0 }.validate().is_err());
        assert!(StopLossRule::FixedFraction { fraction: 1.5 }.validate().is_err());
        assert!(StopLossRule::EntryOpenFloor { lookback: 0 }.validate().is_err());
        assert!(StopLossRule::EntryOpenFloor { lookback: 3 }.validate().is_ok());
    }
}
