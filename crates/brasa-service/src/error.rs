//! # Service Error Types
//!
//! The error surface callers see: domain errors and database errors merged
//! into one enum, plus the few failure modes that only exist at this layer.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Core(...)    blocking user-facing rejections (validation, lifecycle)  │
//! │  Db(...)      persistence failures (connection, constraints)           │
//! │  StoreClosed  storefront checkout while the store toggle is off        │
//! │  NotFound     referenced entity is gone                                │
//! │  ProductUnavailable  draft references a missing or inactive product    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use brasa_core::{CoreError, ValidationError};
use brasa_db::DbError;

/// Errors returned by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation from brasa-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database failure from brasa-db.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Online checkout attempted while the store is closed.
    #[error("store is closed")]
    StoreClosed,

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A draft references a product that is missing or hidden from the menu.
    #[error("product not available: {id}")]
    ProductUnavailable { id: String },
}

impl ServiceError {
    /// Creates a NotFound error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
