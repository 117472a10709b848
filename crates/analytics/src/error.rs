use core_types::CoreError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Initial capital must be positive, got {0}")]
    InvalidCapital(Decimal),

    #[error("Error in calculation: {0}")]
    Calculation(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
