use crate::ema_crossover::EmaCrossover;
use crate::error::StrategyError;
use crate::rsi_mean_reversion::RsiMeanReversion;
use crate::Strategy;
use configuration::StrategyParams;

/// Creates a new, validated strategy instance from a parameter set.
///
/// The match is exhaustive: the compiler will error if a new `StrategyParams`
/// variant is added but not handled here.
pub fn create_strategy(params: &StrategyParams) -> Result<Box<dyn Strategy>, StrategyError> {
    match params {
        StrategyParams::EmaCrossover(p) => Ok(Box::new(EmaCrossover::new(p.clone())?)),
        StrategyParams::RsiMeanReversion(p) => Ok(Box::new(RsiMeanReversion::new(p.clone())?)),
    }
}
