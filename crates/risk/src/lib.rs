//! # Quantscope Risk Analyzer
//!
//! Loss-distribution and tail-risk statistics over the trades of a strategy run,
//! summarized into a qualitative `RiskLevel`.

pub mod analyzer;
pub mod error;
pub mod report;

pub use analyzer::RiskAnalyzer;
pub use error::RiskError;
pub use report::RiskReport;
