//! Configuration management and logging setup.

mod logging;
mod settings;

pub use logging::setup_logging;
pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig, StrategySettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables prefixed `SIGNAL__` override file values, e.g.
/// `SIGNAL__STRATEGY__VARIANT=band_breakout`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SIGNAL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
