//! Error types for the signal engine.
//!
//! Insufficient market data is deliberately absent from this taxonomy:
//! too few bars (or too few bars since entry) is an expected runtime
//! condition and is reported as a `hold` signal with a message, never as
//! an error. The variants here cover configuration and contract faults
//! that must fail fast.

use thiserror::Error;

/// Top-level signal engine error.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Strategy-specific errors (construction and configuration only;
/// `decide` itself is infallible).
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy variant not found: {0}")]
    NotFound(String),
}

/// Data adapter errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available")]
    NoDataAvailable,

    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for signal engine operations.
pub type SignalResult<T> = Result<T, SignalError>;
