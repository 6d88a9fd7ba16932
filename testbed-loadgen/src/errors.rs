//! Load generator errors

use goose::GooseError;
use thiserror::Error;

pub type LoadgenResult<T> = Result<T, LoadgenError>;

#[derive(Debug, Error)]
pub enum LoadgenError {
    #[error("Load test failed: {0}")]
    Goose(#[from] GooseError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid load generator settings: {0}")]
    Settings(String),
}
