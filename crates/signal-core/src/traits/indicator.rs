//! Indicator trait definitions.
//!
//! Output alignment convention: an indicator's output has the same
//! length as its input, with `f64::NAN` (or NaN components) marking
//! entries where not enough history exists yet. Consumers skip NaN
//! entries rather than treating them as values; this keeps every derived
//! series index-aligned with the bar series it came from.

use crate::error::IndicatorError;

/// Trait for single-series technical indicators.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data, aligned
    /// index-for-index with the input.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Minimum data points before the indicator produces defined values.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data for at least one defined value.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Multi-output indicator (e.g. Bollinger Bands, MACD).
///
/// Same alignment convention as [`Indicator`]; undefined entries carry
/// NaN in every component.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values, aligned index-for-index with the input.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Minimum data points before the indicator produces defined values.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
