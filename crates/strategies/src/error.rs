use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Insufficient data: need at least {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("An error occurred during indicator calculation: {0}")]
    IndicatorError(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
