use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::accounts::AccountError;
use crate::cards::CardError;

/// Custom error type for transaction-ledger operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Card {0} is not active")]
    CardNotActive(String),
    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),
    #[error("Account ledger error: {0}")]
    Account(#[from] AccountError),
}

impl From<DieselError> for TransactionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => TransactionError::NotFound("Record not found".to_string()),
            _ => TransactionError::DatabaseError(err.to_string()),
        }
    }
}

impl From<CardError> for TransactionError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::NotFound(msg) => TransactionError::NotFound(msg),
            other => TransactionError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for transaction operations
pub type Result<T> = std::result::Result<T, TransactionError>;
