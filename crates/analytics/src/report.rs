use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Performance summary of a single strategy run.
///
/// This struct is the final output of the `AnalyticsEngine` and serves as the
/// data transfer object for performance results throughout the entire system.
/// All ratios are fractions (0.25 means 25%), rounded to 4 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Share of trades with a strictly positive return, in `[0, 1]`.
    pub win_rate: Decimal,
    /// Compounded growth of the starting capital across all trades.
    pub total_return: Decimal,
    /// Largest peak-to-trough decline of the equity curve, in `[0, 1]`.
    pub max_drawdown: Decimal,
    /// Mean trade return over its population standard deviation. Not annualized.
    pub sharpe_ratio: Decimal,
    pub total_trades: usize,
}

impl PerformanceReport {
    /// Creates a new, zeroed-out PerformanceReport.
    /// This is the report for a run without trades.
    pub fn new() -> Self {
        Self {
            win_rate: Decimal::ZERO,
            total_return: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            total_trades: 0,
        }
    }
}

impl Default for PerformanceReport {
    fn default() -> Self {
        Self::new()
    }
}
