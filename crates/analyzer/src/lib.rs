use analytics::PerformanceReport;
use core_types::StrategyId;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::AnalyzerError;

/// The performance of one strategy configuration within a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub strategy: StrategyId,
    /// Strategy and parameters, e.g. `ema_9_21`.
    pub label: String,
    pub report: PerformanceReport,
}

/// Comparison entries ordered best first, with the winner named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedComparison {
    pub best_strategy: String,
    pub entries: Vec<ComparisonEntry>,
}

/// Ranks strategy configurations that were run against the same data.
#[derive(Debug, Default, Clone)]
pub struct Analyzer {}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders entries by total return, highest first.
    ///
    /// The sort is stable, so among equal returns the entry submitted first wins.
    pub fn rank(&self, mut entries: Vec<ComparisonEntry>) -> Result<RankedComparison, AnalyzerError> {
        if entries.is_empty() {
            return Err(AnalyzerError::NoResults);
        }

        entries.sort_by(|a, b| b.report.total_return.cmp(&a.report.total_return));
        let best_strategy = entries[0].label.clone();

        tracing::info!(best = %best_strategy, candidates = entries.len(), "Strategy comparison ranked");
        Ok(RankedComparison { best_strategy, entries })
    }
}
