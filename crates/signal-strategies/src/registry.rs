//! Variant registry for configuration-driven strategy selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use signal_core::{error::StrategyError, traits::Strategy, traits::StrategyConfig};

use crate::band_breakout::{BandBreakout, BandBreakoutConfig};
use crate::ema_crossover::{EmaCrossover, EmaCrossoverConfig};
use crate::regime::RegimeClassifier;
use crate::regime_split::{RegimeSplit, RegimeSplitConfig};
use crate::stop_loss::StopLossRule;

/// Information about a registered variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInfo {
    /// Variant name
    pub name: String,
    /// Variant description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of the named strategy variants.
///
/// Each preset keeps its historical constants as configured, including
/// the oddly precise stop-loss fractions; they are tuning artifacts and
/// must not be unified.
pub struct VariantRegistry {
    variants: HashMap<String, VariantInfo>,
}

impl VariantRegistry {
    /// Create a registry with all built-in variant presets.
    pub fn new() -> Self {
        let mut variants = HashMap::new();

        variants.insert(
            "band_breakout".to_string(),
            VariantInfo {
                name: "Band Breakout".to_string(),
                description: "Buys lower-band breakdown reversals, exits on upper-band breakouts"
                    .to_string(),
                default_config: serde_json::to_value(BandBreakoutConfig::default()).unwrap(),
            },
        );

        variants.insert(
            "regime_rsi_macd".to_string(),
            VariantInfo {
                name: "Regime RSI/MACD".to_string(),
                description: "RSI/MACD rules split by bull/bear regime".to_string(),
                default_config: serde_json::to_value(RegimeSplitConfig::default()).unwrap(),
            },
        );

        variants.insert(
            "regime_rsi_macd_revert".to_string(),
            VariantInfo {
                name: "Regime RSI/MACD with revert exit".to_string(),
                description:
                    "Regime-split rules with breach-then-revert exit and dead-cross entry gate"
                        .to_string(),
                default_config: serde_json::to_value(RegimeSplitConfig {
                    band_revert_exit: true,
                    dead_cross_gate: Some(100),
                    ..Default::default()
                })
                .unwrap(),
            },
        );

        variants.insert(
            "ema_cross_5_10".to_string(),
            VariantInfo {
                name: "EMA Cross 5/10".to_string(),
                description: "EMA5/20 cross-up entry, EMA5<EMA10 exit".to_string(),
                default_config: serde_json::to_value(EmaCrossoverConfig::default()).unwrap(),
            },
        );

        variants.insert(
            "ema_cross_5_10_floor".to_string(),
            VariantInfo {
                name: "EMA Cross 5/10 with open floor".to_string(),
                description: "EMA5/20 cross-up entry with pre-entry open-floor stop".to_string(),
                default_config: serde_json::to_value(EmaCrossoverConfig {
                    stop_loss: StopLossRule::EntryOpenFloor { lookback: 3 },
                    ..Default::default()
                })
                .unwrap(),
            },
        );

        variants.insert(
            "ema_cross_10_20".to_string(),
            VariantInfo {
                name: "EMA Cross 10/20".to_string(),
                description: "EMA5/20 cross-up entry, EMA10<EMA20 exit, dead-cross gated"
                    .to_string(),
                default_config: serde_json::to_value(EmaCrossoverConfig {
                    exit_fast_span: 10,
                    exit_slow_span: 20,
                    stop_loss: StopLossRule::FixedFraction { fraction: 0.006942 },
                    dead_cross_gate: Some(100),
                    regime: Some(RegimeClassifier::sma(20, 200)),
                    ..Default::default()
                })
                .unwrap(),
            },
        );

        Self { variants }
    }

    /// List all available variants.
    pub fn list(&self) -> Vec<&VariantInfo> {
        self.variants.values().collect()
    }

    /// Get variant info by name.
    pub fn get(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.get(name)
    }

    /// Check if a variant exists.
    pub fn exists(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    /// Get all variant names.
    pub fn names(&self) -> Vec<&String> {
        self.variants.keys().collect()
    }

    /// Create a variant instance from configuration.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        match name {
            "band_breakout" => {
                let config: BandBreakoutConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(BandBreakout::new(config)))
            }
            "regime_rsi_macd" | "regime_rsi_macd_revert" => {
                let config: RegimeSplitConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(RegimeSplit::new(config)))
            }
            "ema_cross_5_10" | "ema_cross_5_10_floor" | "ema_cross_10_20" => {
                let config: EmaCrossoverConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(EmaCrossover::new(config)))
            }
            _ => Err(StrategyError::NotFound(name.to_string())),
        }
    }

    /// Create a variant with its preset configuration.
    pub fn create_default(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone())
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = VariantRegistry::new();
        assert_eq!(registry.list().len(), 6);
    }

    #[test]
    fn test_registry_get() {
        let registry = VariantRegistry::new();

        assert!(registry.get("regime_rsi_macd").is_some());
        assert!(registry.get("unknown").is_none());
        assert!(registry.exists("band_breakout"));
    }

    #[test]
    fn test_create_default_for_every_preset() {
        let registry = VariantRegistry::new();
        for name in registry.names() {
            let strategy = registry.create_default(name);
            assert!(strategy.is_ok(), "preset {} failed to build", name);
            assert!(strategy.unwrap().min_bars() >= 200);
        }
    }

    #[test]
    fn test_preset_stop_loss_constants() {
        let registry = VariantRegistry::new();
        let fraction = |name: &str| {
            registry.get(name).unwrap().default_config["stop_loss"]["fixed_fraction"]["fraction"]
                .as_f64()
                .unwrap()
        };

        assert_eq!(fraction("band_breakout"), 0.01);
        assert_eq!(fraction("regime_rsi_macd"), 0.016942);
        assert_eq!(fraction("regime_rsi_macd_revert"), 0.016942);
        assert_eq!(fraction("ema_cross_5_10"), 0.005);
        assert_eq!(fraction("ema_cross_10_20"), 0.006942);

        let floor = &registry.get("ema_cross_5_10_floor").unwrap().default_config["stop_loss"]
            ["entry_open_floor"]["lookback"];
        assert_eq!(floor.as_u64(), Some(3));
    }

    #[test]
    fn test_create_with_config() {
        let registry = VariantRegistry::new();
        let config = serde_json::json!({
            "buy_fast_span": 5,
            "buy_slow_span": 20,
            "exit_fast_span": 10,
            "exit_slow_span": 20
        });

        assert!(registry.create("ema_cross_10_20", config).is_ok());
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let registry = VariantRegistry::new();
        let config = serde_json::json!({ "buy_fast_span": 50, "buy_slow_span": 5 });

        assert!(registry.create("ema_cross_5_10", config).is_err());
    }

    #[test]
    fn test_create_unknown_variant() {
        let registry = VariantRegistry::new();
        assert!(registry.create_default("unknown").is_err());
    }
}
