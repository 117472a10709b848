use core_types::{MarketRegime, VolatilityLevel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market-condition summary of a candle series. Decimal fields are rounded to 4 places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeReport {
    pub regime: MarketRegime,
    /// R² of a linear fit of close against time, in `[0, 1]`.
    pub trend_strength: Decimal,
    pub volatility_level: VolatilityLevel,
    /// Annualized standard deviation of period returns.
    pub volatility_value: Decimal,
    /// Relative change from the first to the last close.
    pub price_change_pct: Decimal,
}
