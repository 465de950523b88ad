//! Moving average indicators and slope series.

use signal_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the last N values; NaN until the window fills.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        // Initial sum, then slide the window.
        let mut sum: f64 = data[..self.period].iter().sum();
        result[self.period - 1] = sum / period_f64;

        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result[i] = sum / period_f64;
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Recursive definition with smoothing factor α = 2 / (span + 1), seeded
/// by the first value rather than a lookback average, so it is defined
/// at every index.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    alpha: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        let alpha = 2.0 / (span as f64 + 1.0);
        Self { span, alpha }
    }

    /// Create an EMA with a custom smoothing factor.
    pub fn with_alpha(span: usize, alpha: f64) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        assert!((0.0..=1.0).contains(&alpha), "Alpha must be between 0 and 1");
        Self { span, alpha }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(data.len());
        let one_minus_alpha = 1.0 - self.alpha;

        let mut ema = match data.first() {
            Some(&first) => first,
            None => return result,
        };
        result.push(ema);

        for &price in &data[1..] {
            ema = price * self.alpha + ema * one_minus_alpha;
            result.push(ema);
        }

        result
    }

    fn period(&self) -> usize {
        self.span
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Arithmetic first difference of a series, NaN at index 0.
///
/// The slope of a moving-average series is its first difference; NaN
/// operands propagate, so the undefined prefix of an SMA stays undefined
/// one entry longer in its slope.
pub fn diff(data: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; data.len()];
    for i in 1..data.len() {
        result[i] = data[i] - data[i - 1];
    }
    result
}
