use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for card-lifecycle operations
#[derive(Debug, Error)]
pub enum CardError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },
    #[error("Version conflict: {0}")]
    VersionConflict(String),
}

impl From<DieselError> for CardError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => CardError::NotFound("Record not found".to_string()),
            _ => CardError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for card operations
pub type Result<T> = std::result::Result<T, CardError>;
