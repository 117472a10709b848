use analytics::{AnalyticsEngine, PerformanceReport};
use analyzer::{Analyzer, ComparisonEntry, RankedComparison};
use configuration::StrategyParams;
use core_types::{Candle, StrategyId, Trade};
use risk::{RiskAnalyzer, RiskReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strategies::create_strategy;

pub mod error;

pub use error::BacktestError;

/// Everything a single strategy run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    pub strategy: StrategyId,
    pub label: String,
    pub trades: Vec<Trade>,
    pub metrics: PerformanceReport,
    pub risk: RiskReport,
}

/// The main backtesting engine.
///
/// Runs a strategy over an already-fetched candle series and hands the resulting
/// trades to the analytics engine and the risk analyzer. Holds no state between
/// runs, so one instance can serve any number of independent analyses.
#[derive(Debug, Default, Clone)]
pub struct Backtester {
    analytics_engine: AnalyticsEngine,
    risk_analyzer: RiskAnalyzer,
    analyzer: Analyzer,
}

impl Backtester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one strategy configuration and evaluates its trades.
    pub fn run(
        &self,
        candles: &[Candle],
        params: &StrategyParams,
        initial_capital: Decimal,
    ) -> Result<BacktestOutcome, BacktestError> {
        let strategy = create_strategy(params)?;
        let trades = strategy.run(candles)?;

        let metrics = self.analytics_engine.calculate(&trades, initial_capital)?;
        let risk = self.risk_analyzer.analyze(&trades, initial_capital)?;

        tracing::info!(
            strategy = %strategy.label(),
            trades = trades.len(),
            total_return = %metrics.total_return,
            risk_level = %risk.risk_level,
            "Backtest complete"
        );

        Ok(BacktestOutcome {
            strategy: strategy.id(),
            label: strategy.label(),
            trades,
            metrics,
            risk,
        })
    }

    /// Runs several configurations against the same candles and ranks them by total return.
    ///
    /// A configuration the strategy layer rejects (bad parameters, too few candles)
    /// is skipped with a warning. Fails only if no configuration could be run.
    pub fn compare(
        &self,
        candles: &[Candle],
        candidates: &[StrategyParams],
        initial_capital: Decimal,
    ) -> Result<RankedComparison, BacktestError> {
        let mut entries = Vec::with_capacity(candidates.len());

        for (i, params) in candidates.iter().enumerate() {
            match self.run(candles, params, initial_capital) {
                Ok(outcome) => entries.push(ComparisonEntry {
                    strategy: outcome.strategy,
                    label: outcome.label,
                    report: outcome.metrics,
                }),
                Err(BacktestError::Strategy(e)) => {
                    tracing::warn!(candidate = i + 1, label = %params.label(), error = %e, "Skipping strategy configuration");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(self.analyzer.rank(entries)?)
    }
}
