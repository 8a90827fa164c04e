use diesel::result::Error as DieselError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Custom error type for statement-cycle operations
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Over-payment: paying {amount} would exceed the total due of {total_due}")]
    OverPayment { amount: Decimal, total_due: Decimal },
    #[error("Version conflict: {0}")]
    VersionConflict(String),
}

impl From<DieselError> for StatementError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => StatementError::NotFound("Record not found".to_string()),
            _ => StatementError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for statement operations
pub type Result<T> = std::result::Result<T, StatementError>;
