use core_types::StrategyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters for the EMA Crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaCrossoverParams {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for EmaCrossoverParams {
    fn default() -> Self {
        Self {
            short_period: 9,
            long_period: 21,
        }
    }
}

/// Parameters for the RSI Mean-Reversion strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiMeanReversionParams {
    pub period: usize,
    /// RSI level below which the market is considered oversold.
    pub oversold: Decimal,
    /// RSI level above which the market is considered overbought.
    pub overbought: Decimal,
}

impl Default for RsiMeanReversionParams {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: Decimal::from(30),
            overbought: Decimal::from(70),
        }
    }
}

/// A complete strategy selection: which strategy, and with what parameters.
///
/// Serialized as `{"strategy": "ema_crossover", "parameters": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "parameters", rename_all = "snake_case")]
pub enum StrategyParams {
    EmaCrossover(EmaCrossoverParams),
    RsiMeanReversion(RsiMeanReversionParams),
}

impl StrategyParams {
    pub fn id(&self) -> StrategyId {
        match self {
            StrategyParams::EmaCrossover(_) => StrategyId::EmaCrossover,
            StrategyParams::RsiMeanReversion(_) => StrategyId::RsiMeanReversion,
        }
    }

    /// A short label naming both the strategy and its parameters, e.g. `ema_9_21`.
    pub fn label(&self) -> String {
        match self {
            StrategyParams::EmaCrossover(p) => format!("ema_{}_{}", p.short_period, p.long_period),
            StrategyParams::RsiMeanReversion(p) => format!(
                "rsi_{}_{}_{}",
                p.period,
                p.oversold.normalize(),
                p.overbought.normalize()
            ),
        }
    }
}

impl From<EmaCrossoverParams> for StrategyParams {
    fn from(params: EmaCrossoverParams) -> Self {
        StrategyParams::EmaCrossover(params)
    }
}

impl From<RsiMeanReversionParams> for StrategyParams {
    fn from(params: RsiMeanReversionParams) -> Self {
        StrategyParams::RsiMeanReversion(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn labels_name_strategy_and_parameters() {
        assert_eq!(StrategyParams::from(EmaCrossoverParams::default()).label(), "ema_9_21");
        let rsi = RsiMeanReversionParams {
            period: 7,
            oversold: dec!(25.0),
            overbought: dec!(75.5),
        };
        assert_eq!(StrategyParams::from(rsi).label(), "rsi_7_25_75.5");
    }

    #[test]
    fn strategy_params_use_adjacent_tagging() {
        let json = r#"[
            {"strategy": "ema_crossover", "parameters": {"short_period": 12, "long_period": 26}},
            {"strategy": "rsi_mean_reversion", "parameters": {"period": 14, "oversold": 30, "overbought": 70}}
        ]"#;
        let params: Vec<StrategyParams> = serde_json::from_str(json).unwrap();

        assert_eq!(params[0].id(), StrategyId::EmaCrossover);
        assert_eq!(
            params[0],
            StrategyParams::EmaCrossover(EmaCrossoverParams { short_period: 12, long_period: 26 })
        );
        assert_eq!(params[1].id(), StrategyId::RsiMeanReversion);
    }
}
