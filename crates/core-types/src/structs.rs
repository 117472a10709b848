use crate::enums::ExitReason;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLCV bar of market data.
///
/// Only `close` is required by the analytics; the remaining fields are carried
/// through untouched. `close` is still optional on the wire so that a missing
/// value can be reported precisely instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub open: Option<Decimal>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub close: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<Decimal>,
}

impl Candle {
    /// Creates a candle carrying only a close price.
    pub fn from_close(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }
}

/// Extracts the close prices of a candle series, preserving order.
///
/// Fails on the first candle without a close, or with a non-positive close,
/// since period returns are undefined for such a price.
pub fn closes(candles: &[Candle]) -> Result<Vec<Decimal>, CoreError> {
    candles
        .iter()
        .enumerate()
        .map(|(index, candle)| {
            let close = candle
                .close
                .ok_or(CoreError::MissingField { index, field: "close" })?;
            if close <= Decimal::ZERO {
                return Err(CoreError::InvalidInput(
                    format!("close at index {index}"),
                    format!("price must be positive, got {close}"),
                ));
            }
            Ok(close)
        })
        .collect()
}

/// A completed round-trip long trade produced by a strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub entry_index: usize,
    pub exit_index: usize,
    /// Fractional return, `(exit - entry) / entry`.
    #[serde(rename = "return", alias = "return_pct")]
    pub return_pct: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_reason: Option<ExitReason>,
}

impl Trade {
    /// Closes a long position, computing its return from the two prices.
    pub fn close(
        entry_price: Decimal,
        entry_index: usize,
        exit_price: Decimal,
        exit_index: usize,
        exit_reason: Option<ExitReason>,
    ) -> Result<Self, CoreError> {
        if entry_index >= exit_index {
            return Err(CoreError::InvalidInput(
                "trade indices".to_string(),
                format!("entry {entry_index} must precede exit {exit_index}"),
            ));
        }
        let return_pct = (exit_price - entry_price)
            .checked_div(entry_price)
            .ok_or_else(|| CoreError::Calculation(format!("cannot divide by entry price {entry_price}")))?;

        Ok(Self {
            entry_price,
            exit_price,
            entry_index,
            exit_index,
            return_pct,
            exit_reason,
        })
    }
}

/// A trade as received from an external source.
///
/// Producers either send a full `Trade` or a bare object holding only the
/// return (`return` or `return_pct`). Both shapes collapse to a single return
/// value at ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TradeRecord {
    Full(Trade),
    Loose {
        #[serde(rename = "return", alias = "return_pct")]
        value: Decimal,
    },
}

impl TradeRecord {
    pub fn trade_return(&self) -> Decimal {
        match self {
            TradeRecord::Full(trade) => trade.return_pct,
            TradeRecord::Loose { value } => *value,
        }
    }
}

impl From<Trade> for TradeRecord {
    fn from(trade: Trade) -> Self {
        TradeRecord::Full(trade)
    }
}
