use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use core_types::stats::{mean, population_std_dev};
use core_types::Trade;
use rust_decimal::Decimal;

/// Number of decimal places every reported metric is rounded to.
const REPORT_DP: u32 = 4;

/// A stateless calculator for deriving performance metrics from trading activity.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `trades` - All completed `Trade`s of a run, in execution order.
    /// * `initial_capital` - The starting capital; must be positive.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport` or an `AnalyticsError`.
    pub fn calculate(&self, trades: &[Trade], initial_capital: Decimal) -> Result<PerformanceReport, AnalyticsError> {
        let returns: Vec<Decimal> = trades.iter().map(|t| t.return_pct).collect();
        self.calculate_from_returns(&returns, initial_capital)
    }

    /// Same as `calculate`, for callers that only hold per-trade returns.
    pub fn calculate_from_returns(
        &self,
        returns: &[Decimal],
        initial_capital: Decimal,
    ) -> Result<PerformanceReport, AnalyticsError> {
        if initial_capital <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidCapital(initial_capital));
        }

        if returns.is_empty() {
            // If there are no trades, every metric is zero.
            return Ok(PerformanceReport::new());
        }

        let equity_curve = self.equity_curve(returns, initial_capital)?;
        let final_capital = equity_curve.last().copied().unwrap_or(initial_capital);

        let report = PerformanceReport {
            win_rate: self.win_rate(returns).round_dp(REPORT_DP),
            total_return: ((final_capital - initial_capital) / initial_capital).round_dp(REPORT_DP),
            max_drawdown: self.max_drawdown(&equity_curve).round_dp(REPORT_DP),
            sharpe_ratio: self.sharpe_ratio(returns)?.round_dp(REPORT_DP),
            total_trades: returns.len(),
        };

        tracing::debug!(?report, "Performance metrics calculated");
        Ok(report)
    }

    fn win_rate(&self, returns: &[Decimal]) -> Decimal {
        let winners = returns.iter().filter(|r| **r > Decimal::ZERO).count();
        Decimal::from(winners) / Decimal::from(returns.len())
    }

    /// Compounds every return onto the capital. The first point is the starting capital.
    fn equity_curve(&self, returns: &[Decimal], initial_capital: Decimal) -> Result<Vec<Decimal>, AnalyticsError> {
        let mut curve = Vec::with_capacity(returns.len() + 1);
        let mut capital = initial_capital;
        curve.push(capital);

        for r in returns {
            capital = capital
                .checked_mul(Decimal::ONE + r)
                .ok_or_else(|| AnalyticsError::Calculation("equity curve overflowed".to_string()))?;
            curve.push(capital);
        }
        Ok(curve)
    }

    /// Largest relative decline from a running peak of the equity curve.
    fn max_drawdown(&self, equity_curve: &[Decimal]) -> Decimal {
        let Some(&first) = equity_curve.first() else {
            return Decimal::ZERO;
        };

        let mut peak = first;
        let mut max_drawdown = Decimal::ZERO;
        for &equity in equity_curve {
            if equity > peak {
                peak = equity;
            }
            let drawdown = if peak > Decimal::ZERO {
                (peak - equity) / peak
            } else {
                Decimal::ZERO
            };
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
        max_drawdown
    }

    /// Per-trade Sharpe ratio, assuming a zero risk-free rate.
    fn sharpe_ratio(&self, returns: &[Decimal]) -> Result<Decimal, AnalyticsError> {
        if returns.len() < 2 {
            return Ok(Decimal::ZERO);
        }
        let std_dev = population_std_dev(returns)?;
        if std_dev <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let mean_return = mean(returns).unwrap_or(Decimal::ZERO);
        Ok(mean_return / std_dev)
    }
}
