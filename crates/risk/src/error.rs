use core_types::CoreError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Initial capital must be positive, got {0}")]
    InvalidCapital(Decimal),

    #[error(transparent)]
    Core(#[from] CoreError),
}
