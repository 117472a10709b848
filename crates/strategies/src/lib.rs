//! # Quantscope Strategy Library
//!
//! This crate contains the trading logic: the indicator series strategies are
//! built on, a universal `Strategy` trait, and its concrete implementations.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   networks, or persistence. It depends only on `core-types` and `configuration`.
//! - **Single Position:** Every strategy is a long-only state machine holding at most
//!   one open position. A position still open when the series ends is discarded.
//! - **Extensibility:** Adding a new strategy involves creating a new module, implementing
//!   the `Strategy` trait, and adding it to `StrategyParams` and the `factory`.
//!
//! ## Public API
//!
//! - `Strategy`: The core trait all strategies implement.
//! - `create_strategy`: The factory function to construct a strategy instance.
//! - `indicators`: EMA and RSI series.
//! - The concrete strategy structs themselves (e.g., `EmaCrossover`).

// Declare all the modules that constitute this crate.
pub mod ema_crossover;
pub mod error;
pub mod factory;
pub mod indicators;
pub mod rsi_mean_reversion;

// Re-export the key components to create a clean, public-facing API.
pub use ema_crossover::EmaCrossover;
pub use error::StrategyError;
pub use factory::create_strategy;
pub use indicators::{compute_ema, compute_rsi};
pub use rsi_mean_reversion::RsiMeanReversion;

pub use core_types::StrategyId;

use configuration::{EmaCrossoverParams, RsiMeanReversionParams};
use core_types::{Candle, Trade};
use rust_decimal::Decimal;

/// The core trait that all trading strategies must implement.
///
/// A strategy is constructed from already-validated parameters and then run over
/// a complete candle history. Runs are pure: the same candles always produce the
/// same trades, so one instance can be shared across threads.
pub trait Strategy: Send + Sync {
    fn id(&self) -> StrategyId;

    /// Label naming the strategy together with its parameters.
    fn label(&self) -> String;

    /// The minimum number of candles `run` accepts.
    fn required_candles(&self) -> usize;

    /// Simulates the strategy over `candles` and returns every completed trade in order.
    ///
    /// # Returns
    ///
    /// * `Ok(trades)` - the completed trades, possibly empty.
    /// * `Err(StrategyError::InsufficientData)` - if fewer than `required_candles` were given.
    /// * `Err(StrategyError::Core)` - if a candle has no usable close price.
    fn run(&self, candles: &[Candle]) -> Result<Vec<Trade>, StrategyError>;
}

/// Runs the EMA Crossover strategy with the given parameters.
pub fn run_ema_crossover(candles: &[Candle], params: &EmaCrossoverParams) -> Result<Vec<Trade>, StrategyError> {
    EmaCrossover::new(params.clone())?.run(candles)
}

/// Runs the RSI Mean-Reversion strategy with the given parameters.
pub fn run_rsi_mean_reversion(
    candles: &[Candle],
    params: &RsiMeanReversionParams,
) -> Result<Vec<Trade>, StrategyError> {
    RsiMeanReversion::new(params.clone())?.run(candles)
}

/// Position state shared by the long-only strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Position {
    Flat,
    Long { entry_price: Decimal, entry_index: usize },
}

pub(crate) fn ensure_enough_candles(candles: &[Candle], required: usize) -> Result<(), StrategyError> {
    if candles.len() < required {
        return Err(StrategyError::InsufficientData {
            required,
            actual: candles.len(),
        });
    }
    Ok(())
}
