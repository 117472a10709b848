use core_types::RiskLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Risk characteristics of a strategy run. Decimal fields are rounded to 4 places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Population standard deviation of trade returns.
    pub return_volatility: Decimal,
    pub max_consecutive_losses: usize,
    /// The worst single trade return; zero when no trade lost.
    pub largest_loss: Decimal,
    /// Mean of the losing trade returns; zero when no trade lost.
    pub avg_loss: Decimal,
    pub risk_level: RiskLevel,
    /// 5th percentile of trade returns.
    pub value_at_risk_95: Decimal,
}

impl RiskReport {
    /// The report for a run without trades.
    pub fn new() -> Self {
        Self {
            return_volatility: Decimal::ZERO,
            max_consecutive_losses: 0,
            largest_loss: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            risk_level: RiskLevel::Low,
            value_at_risk_95: Decimal::ZERO,
        }
    }
}

impl Default for RiskReport {
    fn default() -> Self {
        Self::new()
    }
}
