use crate::error::ConfigError;
use crate::params::{EmaCrossoverParams, RsiMeanReversionParams};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the entire application.
///
/// Every section falls back to its `Default`, so an empty or partial file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backtest: BacktestSettings,
    pub strategies: Strategies,
    pub logging: Logging,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "backtest.initial_capital must be positive, got {}",
                self.backtest.initial_capital
            )));
        }
        if self.backtest.timeframe.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "backtest.timeframe must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Contains parameters shared by every backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// The initial starting capital for the simulation.
    pub initial_capital: Decimal,
    /// The candle interval the data is expected in (e.g., "1h"). Informational only;
    /// regime volatility is always annualized as hourly data.
    pub timeframe: String,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            initial_capital: Decimal::from(1000),
            timeframe: "1h".to_string(),
        }
    }
}

/// Contains the default parameter sets for all available strategies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategies {
    pub ema_crossover: EmaCrossoverParams,
    pub rsi_mean_reversion: RsiMeanReversionParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Fallback filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
