use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for currency/region reference lookups
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for ReferenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ReferenceError::NotFound("Record not found".to_string()),
            _ => ReferenceError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for reference data operations
pub type Result<T> = std::result::Result<T, ReferenceError>;
