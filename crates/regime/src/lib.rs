//! # Quantscope Regime Analyzer
//!
//! Classifies the market behaviour of a close-price series as trending, ranging
//! or volatile. Works on candles alone; it never looks at trades.

pub mod analyzer;
pub mod error;
pub mod report;

pub use analyzer::{classify_regime, classify_volatility, RegimeAnalyzer};
pub use error::RegimeError;
pub use report::RegimeReport;
