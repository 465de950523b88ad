//! Momentum indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::Ema;

/// Relative Strength Index (RSI).
///
/// Wilder smoothing of average gains and losses: the first average is a
/// simple mean over the window, then
/// `avg = (avg * (period - 1) + value) / period`. Output is NaN until
/// the window fills (index `period`), and consumers must skip those
/// entries.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. The conventional period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        let mut result = vec![f64::NAN; values.len()];
        if values.len() < period {
            return result;
        }

        let period_f64 = period as f64;
        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result[period - 1] = avg;

        for i in period..values.len() {
            avg = (avg * (period_f64 - 1.0) + values[i]) / period_f64;
            result[i] = avg;
        }

        result
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() <= self.period {
            return result;
        }

        let mut gains = Vec::with_capacity(data.len() - 1);
        let mut losses = Vec::with_capacity(data.len() - 1);

        for i in 1..data.len() {
            let change = data[i] - data[i - 1];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let avg_gains = Self::wilder_smooth(&gains, self.period);
        let avg_losses = Self::wilder_smooth(&losses, self.period);

        // Change series is offset one from the bars.
        for i in (self.period - 1)..gains.len() {
            let gain = avg_gains[i];
            let loss = avg_losses[i];
            result[i + 1] = if loss == 0.0 {
                100.0
            } else {
                100.0 - (100.0 / (1.0 + gain / loss))
            };
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
///
/// Components are NaN until their respective windows fill: the MACD line
/// from index `slow - 1`, signal and histogram from
/// `slow + signal_period - 2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Fast and slow EMAs use the recursive first-value-seeded definition;
/// outputs are masked NaN until the slow window (and for the signal
/// line, the signal window on top of it) has filled.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        let len = data.len();
        let mut result = vec![
            MacdOutput {
                macd: f64::NAN,
                signal: f64::NAN,
                histogram: f64::NAN,
            };
            len
        ];
        if len < self.slow_period {
            return result;
        }

        let fast_ema = Ema::new(self.fast_period).calculate(data);
        let slow_ema = Ema::new(self.slow_period).calculate(data);

        let macd_defined = self.slow_period - 1;
        let signal_defined = self.slow_period + self.signal_period - 2;
        let alpha = 2.0 / (self.signal_period as f64 + 1.0);

        // Signal recursion is seeded by the first defined MACD value.
        let mut signal_ema = fast_ema[macd_defined] - slow_ema[macd_defined];

        for i in macd_defined..len {
            let macd = fast_ema[i] - slow_ema[i];
            if i > macd_defined {
                signal_ema = macd * alpha + signal_ema * (1.0 - alpha);
            }

            result[i].macd = macd;
            if i >= signal_defined {
                result[i].signal = signal_ema;
                result[i].histogram = macd - signal_ema;
            }
        }

        result
    }

    fn period(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_bounds() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), data.len());

        for value in &result[..14] {
            assert!(value.is_nan());
        }
        for value in &result[14..] {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert!(result[4].is_nan());
        assert!((result[5] - 100.0).abs() < 1e-10);
        assert!((result[6] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(result[5].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_too_short() {
        let rsi = Rsi::new(14);
        let result = rsi.calculate(&[1.0, 2.0, 3.0]);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_macd_alignment() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), data.len());
        assert!(result[24].macd.is_nan());
        assert!(!result[25].macd.is_nan());
        assert!(result[32].signal.is_nan());
        assert!(!result[33].signal.is_nan());
        assert!(!result[33].histogram.is_nan());

        // In a steady uptrend the fast EMA sits above the slow one.
        assert!(result.last().unwrap().macd > 0.0);
    }

    #[test]
    fn test_macd_histogram_is_macd_minus_signal() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64).sin() * 3.0).collect();
        let result = macd.calculate(&data);

        for out in result.iter().filter(|o| !o.histogram.is_nan()) {
            assert!((out.histogram - (out.macd - out.signal)).abs() < 1e-10);
        }
    }
}
