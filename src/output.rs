//! Terminal rendering of analysis results.

use analytics::PerformanceReport;
use analyzer::RankedComparison;
use backtester::BacktestOutcome;
use comfy_table::Table;
use regime::RegimeReport;
use risk::RiskReport;
use rust_decimal::Decimal;

fn pct(value: Decimal) -> String {
    format!("{:.2}%", value * Decimal::ONE_HUNDRED)
}

fn metric_rows(table: &mut Table, metrics: &PerformanceReport) {
    table.add_row(vec!["Total trades".to_string(), metrics.total_trades.to_string()]);
    table.add_row(vec!["Win rate".to_string(), pct(metrics.win_rate)]);
    table.add_row(vec!["Total return".to_string(), pct(metrics.total_return)]);
    table.add_row(vec!["Max drawdown".to_string(), pct(metrics.max_drawdown)]);
    table.add_row(vec!["Sharpe ratio".to_string(), metrics.sharpe_ratio.to_string()]);
}

fn risk_rows(table: &mut Table, risk: &RiskReport) {
    table.add_row(vec!["Risk level".to_string(), risk.risk_level.to_string()]);
    table.add_row(vec!["Return volatility".to_string(), risk.return_volatility.to_string()]);
    table.add_row(vec!["Max consecutive losses".to_string(), risk.max_consecutive_losses.to_string()]);
    table.add_row(vec!["Largest loss".to_string(), pct(risk.largest_loss)]);
    table.add_row(vec!["Average loss".to_string(), pct(risk.avg_loss)]);
    table.add_row(vec!["VaR (95%)".to_string(), pct(risk.value_at_risk_95)]);
}

pub fn backtest_table(outcome: &BacktestOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Backtest".to_string(), outcome.label.clone()]);
    metric_rows(&mut table, &outcome.metrics);
    risk_rows(&mut table, &outcome.risk);
    table
}

pub fn comparison_table(ranked: &RankedComparison) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Strategy", "Trades", "Win rate", "Total return", "Max drawdown", "Sharpe"]);
    for (rank, entry) in ranked.entries.iter().enumerate() {
        let r = &entry.report;
        table.add_row(vec![
            (rank + 1).to_string(),
            entry.label.clone(),
            r.total_trades.to_string(),
            pct(r.win_rate),
            pct(r.total_return),
            pct(r.max_drawdown),
            r.sharpe_ratio.to_string(),
        ]);
    }
    table
}

pub fn regime_table(report: &RegimeReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Market", "Value"]);
    table.add_row(vec!["Regime".to_string(), report.regime.to_string()]);
    table.add_row(vec!["Trend strength".to_string(), report.trend_strength.to_string()]);
    table.add_row(vec![
        "Volatility".to_string(),
        format!("{} ({})", report.volatility_value, report.volatility_level),
    ]);
    table.add_row(vec!["Price change".to_string(), pct(report.price_change_pct)]);
    table
}

pub fn risk_table(report: &RiskReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Risk", "Value"]);
    risk_rows(&mut table, report);
    table
}
