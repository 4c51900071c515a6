//! # Error Types
//!
//! Domain-specific error types for brasa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brasa-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  brasa-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  brasa-service errors (separate crate)                                 │
//! │  └── ServiceError     - What callers see                               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (order id, status, field)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::{OrderStatus, PickupType};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They should be caught and
/// translated to user-friendly messages at the service boundary.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// The order is in a terminal status and cannot change anymore.
    ///
    /// Raised when advancing or cancelling a `Completed`/`Cancelled` order.
    /// Callers showing a kanban board usually treat this as a no-op.
    #[error("Order is {status:?} and cannot transition further")]
    TerminalStatus { status: OrderStatus },

    /// Rescheduling only makes sense for scheduled pickups.
    #[error("Order has pickup type {pickup_type:?}, only scheduled orders can be rescheduled")]
    NotScheduled { pickup_type: PickupType },

    /// The typed street does not match the neighborhood allow-list.
    #[error("Street '{street}' is not served in the selected neighborhood")]
    StreetNotEligible { street: String },

    /// Category still referenced by products cannot be deleted.
    #[error("Category {category_id} is referenced by {product_count} product(s) and cannot be deleted")]
    CategoryInUse {
        category_id: String,
        product_count: usize,
    },

    /// Cashier session state does not allow the operation.
    ///
    /// Opening an already-open cashier, or closing a closed one.
    #[error("Cashier is already {state}")]
    CashierState { state: &'static str },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a draft order (or other user input) doesn't meet
/// requirements. Raised synchronously, before anything is persisted.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad "HH:MM" slot string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// An order needs at least one line item.
    #[error("order must contain at least one item")]
    EmptyOrder,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TerminalStatus {
            status: OrderStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "Order is Completed and cannot transition further"
        );

        let err = CoreError::CategoryInUse {
            category_id: "cat-1".to_string(),
            product_count: 3,
        };
        assert!(err.to_string().contains("cat-1"));
        assert!(err.to_string().contains("3 product"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer_name".to_string(),
        };
        assert_eq!(err.to_string(), "customer_name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::EmptyOrder;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
