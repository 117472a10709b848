use crate::error::StrategyError;
use crate::indicators::{compute_ema, to_f64_series};
use crate::{ensure_enough_candles, Position, Strategy};
use configuration::{EmaCrossoverParams, StrategyParams};
use core_types::{closes, Candle, StrategyId, Trade};
use rust_decimal::Decimal;

/// The EMA Crossover strategy.
///
/// Goes long on a golden cross (short EMA crosses above long EMA) and closes on
/// the following death cross (short EMA crosses below long EMA).
#[derive(Debug, Clone)]
pub struct EmaCrossover {
    params: EmaCrossoverParams,
}

impl EmaCrossover {
    /// Creates a new `EmaCrossover` instance with the given parameters.
    ///
    /// It performs validation to ensure the parameters are logical.
    pub fn new(params: EmaCrossoverParams) -> Result<Self, StrategyError> {
        Self::validate(&params)?;
        Ok(Self { params })
    }

    pub fn validate(params: &EmaCrossoverParams) -> Result<(), StrategyError> {
        if params.short_period == 0 || params.long_period == 0 {
            return Err(StrategyError::InvalidParameters(format!(
                "EMA periods must be positive, got short={} long={}",
                params.short_period, params.long_period
            )));
        }
        if params.short_period >= params.long_period {
            return Err(StrategyError::InvalidParameters(format!(
                "short_period ({}) must be less than long_period ({})",
                params.short_period, params.long_period
            )));
        }
        Ok(())
    }

    pub fn params(&self) -> &EmaCrossoverParams {
        &self.params
    }
}

impl Strategy for EmaCrossover {
    fn id(&self) -> StrategyId {
        StrategyId::EmaCrossover
    }

    fn label(&self) -> String {
        StrategyParams::EmaCrossover(self.params.clone()).label()
    }

    fn required_candles(&self) -> usize {
        self.params.long_period
    }

    fn run(&self, candles: &[Candle]) -> Result<Vec<Trade>, StrategyError> {
        ensure_enough_candles(candles, self.required_candles())?;

        let prices = closes(candles)?;
        let series = to_f64_series(&prices)?;
        let short = compute_ema(&series, self.params.short_period)?;
        let long = compute_ema(&series, self.params.long_period)?;

        let trades = simulate(&prices, &short, &long)?;
        tracing::info!(
            strategy = %self.label(),
            candles = candles.len(),
            trades = trades.len(),
            "EMA crossover run complete"
        );
        Ok(trades)
    }
}

/// Walks the two EMA series and records a trade for every golden/death cross pair.
///
/// Every index from 1 onwards is eligible; the EMAs are defined from index 0.
pub fn simulate(prices: &[Decimal], short: &[f64], long: &[f64]) -> Result<Vec<Trade>, StrategyError> {
    let len = prices.len().min(short.len()).min(long.len());
    let mut trades = Vec::new();
    let mut position = Position::Flat;

    for i in 1..len {
        let (prev_short, prev_long) = (short[i - 1], long[i - 1]);
        let (curr_short, curr_long) = (short[i], long[i]);

        match position {
            Position::Flat => {
                let golden_cross = prev_short <= prev_long && curr_short > curr_long;
                if golden_cross {
                    tracing::debug!(index = i, price = %prices[i], "Golden cross: entering long");
                    position = Position::Long {
                        entry_price: prices[i],
                        entry_index: i,
                    };
                }
            }
            Position::Long { entry_price, entry_index } => {
                let death_cross = prev_short >= prev_long && curr_short < curr_long;
                if death_cross {
                    let trade = Trade::close(entry_price, entry_index, prices[i], i, None)?;
                    tracing::debug!(index = i, price = %prices[i], ret = %trade.return_pct, "Death cross: closing long");
                    trades.push(trade);
                    position = Position::Flat;
                }
            }
        }
    }

    if let Position::Long { entry_index, .. } = position {
        tracing::debug!(entry_index, "Discarding position still open at end of series");
    }
    Ok(trades)
}
