//! Position state as seen by the decision core.
//!
//! The orchestrator owns this value: it sets it after a confirmed buy
//! fill and clears it after a confirmed sell fill, re-deriving it from
//! account state each cycle to survive restarts. The signal engine only
//! ever reads it.

use serde::{Deserialize, Serialize};

/// Whether the account is flat or holding, and if holding, when and at
/// what price the position was entered.
///
/// Invariant: `entry_time` and `entry_price` are both set iff
/// `is_holding` is true. The fields are separate options rather than an
/// enum because a caller can hand the engine a holding state without
/// entry details (e.g. balance detected but fill record lost); that is a
/// recoverable inconsistency the strategies answer with a hold, not a
/// state this type should make unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PositionState {
    /// True when the account holds a non-zero balance of the asset.
    pub is_holding: bool,
    /// Entry timestamp in epoch milliseconds, set on a confirmed buy.
    pub entry_time: Option<i64>,
    /// Average entry price, set on a confirmed buy.
    pub entry_price: Option<f64>,
}

impl PositionState {
    /// A flat position: buying is possible, selling is not.
    pub fn flat() -> Self {
        Self::default()
    }

    /// A holding position with full entry details.
    pub fn holding(entry_time: i64, entry_price: f64) -> Self {
        Self {
            is_holding: true,
            entry_time: Some(entry_time),
            entry_price: Some(entry_price),
        }
    }

    /// Entry details, present only when holding with both fields set.
    pub fn entry(&self) -> Option<(i64, f64)> {
        if !self.is_holding {
            return None;
        }
        match (self.entry_time, self.entry_price) {
            (Some(time), Some(price)) => Some((time, price)),
            _ => None,
        }
    }
}
