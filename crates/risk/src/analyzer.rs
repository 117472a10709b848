use crate::error::RiskError;
use crate::report::RiskReport;
use core_types::stats::{mean, population_std_dev, quantile};
use core_types::{RiskLevel, Trade, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const REPORT_DP: u32 = 4;

/// Confidence of the reported value at risk.
const VAR_CONFIDENCE: Decimal = dec!(0.95);

/// A stateless analyzer of the risk profile of a list of trades.
#[derive(Debug, Default, Clone)]
pub struct RiskAnalyzer {}

impl RiskAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, trades: &[Trade], initial_capital: Decimal) -> Result<RiskReport, RiskError> {
        let returns: Vec<Decimal> = trades.iter().map(|t| t.return_pct).collect();
        self.analyze_returns(&returns, initial_capital)
    }

    /// Analyzes externally supplied trades, whatever shape each record arrived in.
    pub fn analyze_records(&self, records: &[TradeRecord], initial_capital: Decimal) -> Result<RiskReport, RiskError> {
        let returns: Vec<Decimal> = records.iter().map(TradeRecord::trade_return).collect();
        self.analyze_returns(&returns, initial_capital)
    }

    /// Computes the risk report from per-trade returns in execution order.
    ///
    /// `initial_capital` does not enter any statistic; it is validated so that
    /// this analyzer accepts exactly the inputs the analytics engine does.
    pub fn analyze_returns(&self, returns: &[Decimal], initial_capital: Decimal) -> Result<RiskReport, RiskError> {
        if initial_capital <= Decimal::ZERO {
            return Err(RiskError::InvalidCapital(initial_capital));
        }
        if returns.is_empty() {
            // No trades means no risk taken.
            return Ok(RiskReport::new());
        }

        let return_volatility = if returns.len() < 2 {
            Decimal::ZERO
        } else {
            population_std_dev(returns)?
        };
        let max_consecutive_losses = max_consecutive_losses(returns);

        let losses: Vec<Decimal> = returns.iter().copied().filter(|r| *r < Decimal::ZERO).collect();
        let largest_loss = losses.iter().min().copied().unwrap_or(Decimal::ZERO);
        let avg_loss = mean(&losses).unwrap_or(Decimal::ZERO);

        let value_at_risk_95 = if returns.len() < 2 {
            Decimal::ZERO
        } else {
            quantile(returns, Decimal::ONE - VAR_CONFIDENCE).unwrap_or(Decimal::ZERO)
        };

        let risk_level = classify_risk(return_volatility, max_consecutive_losses, largest_loss);

        let report = RiskReport {
            return_volatility: return_volatility.round_dp(REPORT_DP),
            max_consecutive_losses,
            largest_loss: largest_loss.round_dp(REPORT_DP),
            avg_loss: avg_loss.round_dp(REPORT_DP),
            risk_level,
            value_at_risk_95: value_at_risk_95.round_dp(REPORT_DP),
        };
        tracing::debug!(?report, "Risk metrics calculated");
        Ok(report)
    }
}

/// Length of the longest run of strictly negative returns.
fn max_consecutive_losses(returns: &[Decimal]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for r in returns {
        if *r < Decimal::ZERO {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Scores volatility, losing streaks and the worst loss independently (0-2 points
/// each) and maps the total onto a risk level.
pub fn classify_risk(volatility: Decimal, max_consecutive_losses: usize, largest_loss: Decimal) -> RiskLevel {
    let volatility_score = if volatility > dec!(0.15) {
        2
    } else if volatility > dec!(0.08) {
        1
    } else {
        0
    };

    let streak_score = if max_consecutive_losses > 5 {
        2
    } else if max_consecutive_losses > 3 {
        1
    } else {
        0
    };

    let loss_score = if largest_loss < dec!(-0.15) {
        2
    } else if largest_loss < dec!(-0.08) {
        1
    } else {
        0
    };

    match volatility_score + streak_score + loss_score {
        0..=2 => RiskLevel::Low,
        3..=4 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(returns: &[Decimal]) -> RiskReport {
        RiskAnalyzer::new().analyze_returns(returns, dec!(1000)).unwrap()
    }

    #[test]
    fn no_trades_is_low_risk() {
        let report = RiskAnalyzer::new().analyze(&[], dec!(1000)).unwrap();
        assert_eq!(report, RiskReport::new());
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn mixed_trades_loss_profile() {
        let report = analyze(&[dec!(0.1), dec!(-0.05), dec!(-0.1), dec!(0.2)]);

        assert_eq!(report.max_consecutive_losses, 2);
        assert_eq!(report.largest_loss, dec!(-0.1));
        assert_eq!(report.avg_loss, dec!(-0.075));
        assert_eq!(report.value_at_risk_95, dec!(-0.0925));
        assert_eq!(report.return_volatility, dec!(0.1192));
        // volatility +1, streak +0, largest loss +1
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn winning_trade_resets_the_losing_streak() {
        let returns = [dec!(-0.01), dec!(-0.01), dec!(0), dec!(-0.01), dec!(-0.01), dec!(-0.01)];
        assert_eq!(analyze(&returns).max_consecutive_losses, 3);
    }

    #[test]
    fn breakeven_trades_are_not_losses() {
        let report = analyze(&[dec!(0), -Decimal::ZERO, dec!(-0.1)]);
        assert_eq!(report.avg_loss, dec!(-0.1));
        assert_eq!(report.largest_loss, dec!(-0.1));
        assert_eq!(report.max_consecutive_losses, 1);
    }

    #[test]
    fn single_trade_has_no_dispersion_statistics() {
        let report = analyze(&[dec!(-0.2)]);
        assert_eq!(report.return_volatility, Decimal::ZERO);
        assert_eq!(report.value_at_risk_95, Decimal::ZERO);
        assert_eq!(report.largest_loss, dec!(-0.2));
        assert_eq!(report.avg_loss, dec!(-0.2));
    }

    #[test]
    fn only_winners_have_no_losses() {
        let report = analyze(&[dec!(0.05), dec!(0.02)]);
        assert_eq!(report.largest_loss, Decimal::ZERO);
        assert_eq!(report.avg_loss, Decimal::ZERO);
        assert_eq!(report.max_consecutive_losses, 0);
    }

    #[test]
    fn long_losing_streak_with_large_swing_is_high_risk() {
        let mut returns = vec![dec!(0.5)];
        returns.extend([dec!(-0.2); 6]);
        let report = analyze(&returns);

        assert_eq!(report.max_consecutive_losses, 6);
        assert!(report.return_volatility > dec!(0.15));
        assert_eq!(report.risk_level, RiskLevel::High);
    }

    #[test]
    fn risk_bands_sum_independently() {
        assert_eq!(classify_risk(dec!(0.05), 0, dec!(0)), RiskLevel::Low);
        assert_eq!(classify_risk(dec!(0.16), 0, dec!(-0.09)), RiskLevel::Medium);
        assert_eq!(classify_risk(dec!(0.16), 4, dec!(-0.09)), RiskLevel::Medium);
        assert_eq!(classify_risk(dec!(0.16), 4, dec!(-0.16)), RiskLevel::High);
        // Band edges are exclusive.
        assert_eq!(classify_risk(dec!(0.15), 5, dec!(-0.15)), RiskLevel::Medium);
        assert_eq!(classify_risk(dec!(0.08), 3, dec!(-0.08)), RiskLevel::Low);
    }

    #[test]
    fn loosely_typed_records_are_normalized() {
        let records: Vec<TradeRecord> =
            serde_json::from_str(r#"[{"return": 0.1}, {"return_pct": -0.05}, {"return": -0.1}, {"return": 0.2}]"#)
                .unwrap();
        let report = RiskAnalyzer::new().analyze_records(&records, dec!(1000)).unwrap();
        assert_eq!(report, analyze(&[dec!(0.1), dec!(-0.05), dec!(-0.1), dec!(0.2)]));
    }

    #[test]
    fn rejects_non_positive_capital() {
        assert!(matches!(
            RiskAnalyzer::new().analyze_returns(&[dec!(0.1)], dec!(-1)),
            Err(RiskError::InvalidCapital(_))
        ));
    }
}
