use thiserror::Error;

use crate::form::SubmitError;

#[derive(Error, Debug)]
pub enum PaisaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl From<SubmitError> for PaisaError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::UnknownCategory(name) => PaisaError::UnknownCategory(name),
            SubmitError::InvalidDate(date) => PaisaError::InvalidDate(date),
            SubmitError::AmountTooLarge(digits) => {
                PaisaError::InvalidAmount(format!("{digits} is too large"))
            }
            other => PaisaError::Other(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PaisaError>;
