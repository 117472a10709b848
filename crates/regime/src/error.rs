use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegimeError {
    #[error("Insufficient data: regime analysis needs at least {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Regression error: {0}")]
    Regression(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
