use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("No strategy configuration produced a result to rank")]
    NoResults,
}
