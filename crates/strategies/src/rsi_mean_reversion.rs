use crate::error::StrategyError;
use crate::indicators::{compute_rsi, to_f64_series};
use crate::{ensure_enough_candles, Position, Strategy};
use configuration::{RsiMeanReversionParams, StrategyParams};
use core_types::{closes, Candle, ExitReason, StrategyId, Trade};
use rust_decimal::prelude::*;

/// RSI level whose downward crossing stops out a position that failed to reach overbought.
const MID_LEVEL: f64 = 50.0;
/// A mid-level stop only fires once the position has been held longer than this many candles.
const MIN_HOLD_FOR_MID_EXIT: usize = 5;

/// The RSI Mean-Reversion strategy.
///
/// Buys when RSI dips below the oversold level, expecting a bounce. Sells when RSI
/// rises through the overbought level, or, failing that, when RSI falls back
/// through 50 after the position has had time to work.
#[derive(Debug, Clone)]
pub struct RsiMeanReversion {
    params: RsiMeanReversionParams,
    oversold: f64,
    overbought: f64,
}

impl RsiMeanReversion {
    /// Creates a new `RsiMeanReversion` instance with the given parameters.
    pub fn new(params: RsiMeanReversionParams) -> Result<Self, StrategyError> {
        Self::validate(&params)?;
        let oversold = threshold(params.oversold)?;
        let overbought = threshold(params.overbought)?;
        Ok(Self {
            params,
            oversold,
            overbought,
        })
    }

    pub fn validate(params: &RsiMeanReversionParams) -> Result<(), StrategyError> {
        if params.period == 0 {
            return Err(StrategyError::InvalidParameters(
                "RSI period must be positive".to_string(),
            ));
        }
        let hundred = Decimal::ONE_HUNDRED;
        for (name, level) in [("oversold", params.oversold), ("overbought", params.overbought)] {
            if level <= Decimal::ZERO || level >= hundred {
                return Err(StrategyError::InvalidParameters(format!(
                    "{name} must be between 0 and 100, got {level}"
                )));
            }
        }
        if params.oversold >= params.overbought {
            return Err(StrategyError::InvalidParameters(format!(
                "oversold ({}) must be less than overbought ({})",
                params.oversold, params.overbought
            )));
        }
        Ok(())
    }

    pub fn params(&self) -> &RsiMeanReversionParams {
        &self.params
    }
}

fn threshold(level: Decimal) -> Result<f64, StrategyError> {
    level
        .to_f64()
        .ok_or_else(|| StrategyError::InvalidParameters(format!("RSI level {level} is not representable")))
}

impl Strategy for RsiMeanReversion {
    fn id(&self) -> StrategyId {
        StrategyId::RsiMeanReversion
    }

    fn label(&self) -> String {
        StrategyParams::RsiMeanReversion(self.params.clone()).label()
    }

    fn required_candles(&self) -> usize {
        self.params.period + 1
    }

    fn run(&self, candles: &[Candle]) -> Result<Vec<Trade>, StrategyError> {
        ensure_enough_candles(candles, self.required_candles())?;

        let prices = closes(candles)?;
        let rsi = compute_rsi(&to_f64_series(&prices)?, self.params.period)?;

        let trades = simulate(&prices, &rsi, self.oversold, self.overbought)?;
        tracing::info!(
            strategy = %self.label(),
            candles = candles.len(),
            trades = trades.len(),
            "RSI mean-reversion run complete"
        );
        Ok(trades)
    }
}

/// Walks the RSI series from index 1 and records every completed round trip.
///
/// Indices where either the current or previous RSI is undefined produce no
/// transition. When both exits would fire on the same candle the overbought
/// exit wins.
pub fn simulate(
    prices: &[Decimal],
    rsi: &[Option<f64>],
    oversold: f64,
    overbought: f64,
) -> Result<Vec<Trade>, StrategyError> {
    let len = prices.len().min(rsi.len());
    let mut trades = Vec::new();
    let mut position = Position::Flat;

    for i in 1..len {
        let (Some(prev), Some(curr)) = (rsi[i - 1], rsi[i]) else {
            continue;
        };

        match position {
            Position::Flat => {
                if prev >= oversold && curr < oversold {
                    tracing::debug!(index = i, rsi = curr, price = %prices[i], "RSI oversold: entering long");
                    position = Position::Long {
                        entry_price: prices[i],
                        entry_index: i,
                    };
                }
            }
            Position::Long { entry_price, entry_index } => {
                let exit = if prev <= overbought && curr > overbought {
                    Some(ExitReason::Overbought)
                } else if prev >= MID_LEVEL && curr < MID_LEVEL && i > entry_index + MIN_HOLD_FOR_MID_EXIT {
                    Some(ExitReason::MidLevelExit)
                } else {
                    None
                };

                if let Some(reason) = exit {
                    let trade = Trade::close(entry_price, entry_index, prices[i], i, Some(reason))?;
                    tracing::debug!(index = i, rsi = curr, ?reason, ret = %trade.return_pct, "RSI exit: closing long");
                    trades.push(trade);
                    position = Position::Flat;
                }
            }
        }
    }

    Ok(trades)
}
