// Module declarations
pub(crate) mod reference_errors;
pub(crate) mod reference_model;
pub(crate) mod reference_repository;
pub(crate) mod reference_service;
pub(crate) mod reference_traits;

// Re-export the public interface
pub use reference_model::{Currency, CurrencyDB, Region, RegionDB};
pub use reference_repository::ReferenceRepository;
pub use reference_service::ReferenceService;
pub use reference_traits::ReferenceServiceTrait;

// Re-export error types for convenience
pub use reference_errors::{ReferenceError, Result};
