use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Candle at index {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Calculation error: {0}")]
    Calculation(String),
}
