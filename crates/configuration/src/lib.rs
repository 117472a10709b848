use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod params;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use params::{EmaCrossoverParams, RsiMeanReversionParams, StrategyParams};
pub use settings::{BacktestSettings, Config, Logging, Strategies};

/// Prefix of environment variables that override file settings,
/// e.g. `QUANTSCOPE__BACKTEST__INITIAL_CAPITAL=5000`.
pub const ENV_PREFIX: &str = "QUANTSCOPE";

/// Loads the application configuration.
///
/// Sources are layered lowest to highest: built-in defaults, the TOML file at
/// `path` (skipped if it does not exist), then `QUANTSCOPE__*` environment
/// variables. The merged result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}
