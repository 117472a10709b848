pub mod enums;
pub mod error;
pub mod stats;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ExitReason, MarketRegime, RiskLevel, StrategyId, VolatilityLevel};
pub use error::CoreError;
pub use structs::{closes, Candle, Trade, TradeRecord};
