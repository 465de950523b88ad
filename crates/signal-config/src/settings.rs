//! Configuration structures.

use serde::{Deserialize, Serialize};
use signal_core::error::SignalError;
use signal_core::traits::Strategy;
use signal_strategies::VariantRegistry;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Build the configured strategy variant through the registry.
    pub fn build_strategy(&self) -> Result<Box<dyn Strategy>, SignalError> {
        let registry = VariantRegistry::new();
        let strategy = match &self.strategy.params {
            Some(params) => registry.create(&self.strategy.variant, params.clone())?,
            None => registry.create_default(&self.strategy.variant)?,
        };
        Ok(strategy)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "signal-engine".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Strategy variant selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Registry name of the variant to run
    pub variant: String,
    /// Variant configuration; omit to use the preset defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            variant: "regime_rsi_macd".to_string(),
            params: None,
        }
    }
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    pub symbol: String,
    pub timeframe: String,
    pub csv_path: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            symbol: "KRW-DOGE".to_string(),
            timeframe: "15m".to_string(),
            csv_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_strategy() {
        let config = AppConfig::default();
        let strategy = config.build_strategy().unwrap();

        assert_eq!(strategy.name(), "Regime Split");
    }

    #[test]
    fn test_explicit_params_override_preset() {
        let config = AppConfig {
            strategy: StrategySettings {
                variant: "ema_cross_5_10".to_string(),
                params: Some(serde_json::json!({ "exit_fast_span": 10, "exit_slow_span": 20 })),
            },
            ..Default::default()
        };

        assert!(config.build_strategy().is_ok());
    }

    #[test]
    fn test_unknown_variant_fails() {
        let config = AppConfig {
            strategy: StrategySettings {
                variant: "does_not_exist".to_string(),
                params: None,
            },
            ..Default::default()
        };

        assert!(config.build_strategy().is_err());
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = AppConfig::default();
        let rendered = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.strategy.variant, "regime_rsi_macd");
        assert_eq!(parsed.data.symbol, "KRW-DOGE");
    }
}
