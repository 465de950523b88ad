//! Trading signal types: the sole output of a strategy variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommended trading action.
///
/// `Hold` serializes to the empty string; orchestrators interpret an
/// empty action as "no trade this cycle".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Action {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "")]
    #[default]
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
            Action::Hold => "",
        };
        write!(f, "{}", s)
    }
}

/// Coarse market classification from a moving-average comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Bull,
    Bear,
}

impl Regime {
    pub fn is_bull(&self) -> bool {
        matches!(self, Regime::Bull)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Regime::Bull => "bull",
            Regime::Bear => "bear",
        };
        write!(f, "{}", s)
    }
}

/// The decision emitted by a strategy variant for one evaluation cycle.
///
/// A pure function of the bar series and position state at call time;
/// variants keep no memory between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Recommended action.
    pub action: Action,
    /// Market regime at evaluation time, when the variant classifies one.
    pub regime: Option<Regime>,
    /// Human-readable justification. Empty for an uneventful hold;
    /// informational holds (e.g. insufficient history) carry a message.
    pub message: String,
}

impl Signal {
    /// An uneventful hold: no trade, nothing to explain.
    pub fn hold() -> Self {
        Self {
            action: Action::Hold,
            regime: None,
            message: String::new(),
        }
    }

    /// A hold with an explanatory message (cold start, missing entry
    /// info, not enough bars since entry).
    pub fn hold_because(message: impl Into<String>) -> Self {
        Self {
            action: Action::Hold,
            regime: None,
            message: message.into(),
        }
    }

    /// Attach a regime label to a hold.
    pub fn with_regime(mut self, regime: Option<Regime>) -> Self {
        self.regime = regime;
        self
    }

    pub fn buy(regime: Option<Regime>, message: impl Into<String>) -> Self {
        Self {
            action: Action::Buy,
            regime,
            message: message.into(),
        }
    }

    pub fn sell(regime: Option<Regime>, message: impl Into<String>) -> Self {
        Self {
            action: Action::Sell,
            regime,
            message: message.into(),
        }
    }

    pub fn is_hold(&self) -> bool {
        self.action == Action::Hold
    }
}
