use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Strategy execution error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Risk analysis error: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Analytics calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Strategy comparison error: {0}")]
    Analyzer(#[from] analyzer::AnalyzerError),
}
