// Module declarations
pub(crate) mod statements_errors;
pub(crate) mod statements_model;
pub(crate) mod statements_repository;
pub(crate) mod statements_service;
pub(crate) mod statements_traits;

// Re-export the public interface
pub use statements_model::{NewStatement, Statement, StatementDB};
pub use statements_repository::StatementRepository;
pub use statements_service::StatementService;
pub use statements_traits::StatementServiceTrait;

// Re-export error types for convenience
pub use statements_errors::{Result, StatementError};
