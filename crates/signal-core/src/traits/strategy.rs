//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{BarSeries, PositionState, Signal};

/// Configuration trait for strategy variants.
///
/// Tunable constants (thresholds, windows, stop-loss fractions) live in
/// the config; validation rejects malformed values at construction time
/// so `decide` never has to.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Core strategy variant trait.
///
/// A variant is a pure rule set: `decide` reads the bar series and the
/// current position state and recommends an action. It never mutates the
/// position (order execution and state transitions are the
/// orchestrator's job) and keeps no memory between calls.
///
/// Shared contract across all variants:
/// - series shorter than [`min_bars`](Strategy::min_bars) bars: hold with
///   an "insufficient data" message, never buy or sell;
/// - flat position: only buy or hold may be returned;
/// - holding position: only sell or hold, and only with entry details
///   present — a holding state without them answers hold;
/// - stop-loss is evaluated before every other exit condition and does
///   not wait for post-entry history.
pub trait Strategy: Send + Sync {
    /// Get the unique name of this variant.
    fn name(&self) -> &str;

    /// Get a description of the variant.
    fn description(&self) -> &str {
        ""
    }

    /// Minimum number of bars before the variant will consider trading.
    fn min_bars(&self) -> usize;

    /// Evaluate the series against the position state and recommend an
    /// action for this cycle.
    fn decide(&self, series: &BarSeries, position: &PositionState) -> Signal;
}
