//! Volatility indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::MultiOutputIndicator;

/// Bollinger Bands output. All components NaN until the window fills.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
    /// Band width (upper - lower)
    pub width: f64,
}

/// Bollinger Bands.
///
/// Middle band is an SMA with upper and lower bands offset by a multiple
/// of the population standard deviation over the same window.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        let mut result = vec![
            BollingerOutput {
                upper: f64::NAN,
                middle: f64::NAN,
                lower: f64::NAN,
                width: f64::NAN,
            };
            data.len()
        ];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        for (offset, window) in data.windows(self.period).enumerate() {
            let i = offset + self.period - 1;
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            let std_dev = variance.sqrt();

            let upper = mean + self.std_dev_multiplier * std_dev;
            let lower = mean - self.std_dev_multiplier * std_dev;

            result[i] = BollingerOutput {
                upper,
                middle: mean,
                lower,
                width: upper - lower,
            };
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_ordering() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let result = bb.calculate(&data);
        assert_eq!(result.len(), data.len());

        for out in &result[..19] {
            assert!(out.middle.is_nan());
        }
        for out in &result[19..] {
            assert!(out.upper > out.middle);
            assert!(out.middle > out.lower);
            assert!((out.width - (out.upper - out.lower)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_bollinger_collapses_on_constant_input() {
        let bb = BollingerBands::with_params(5, 2.0);
        let data = vec![100.0; 10];

        let result = bb.calculate(&data);
        let last = result.last().unwrap();

        // Zero volatility: the bands pinch onto the middle.
        assert!(last.width.abs() < 1e-10);
        assert!((last.upper - 100.0).abs() < 1e-10);
        assert!((last.lower - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_bollinger_known_window() {
        let bb = BollingerBands::with_params(3, 2.0);
        let data = vec![1.0, 2.0, 3.0];
        let result = bb.calculate(&data);

        // Window [1, 2, 3]: mean 2, population variance 2/3.
        let std_dev = (2.0f64 / 3.0).sqrt();
        let last = result.last().unwrap();
        assert!((last.middle - 2.0).abs() < 1e-10);
        assert!((last.upper - (2.0 + 2.0 * std_dev)).abs() < 1e-10);
        assert!((last.lower - (2.0 - 2.0 * std_dev)).abs() < 1e-10);
    }
}
