//! # Validation Module
//!
//! Draft-order validation for Brasa POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (TypeScript)                                      │
//! │  ├── Basic format checks, disabled submit button                       │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before anything is persisted)                   │
//! │  ├── Required fields per pickup type                                   │
//! │  ├── Quantity bounds                                                   │
//! │  └── Street eligibility                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / UNIQUE / FK constraints                                │
//! │                                                                         │
//! │  Defense in depth: each layer catches different mistakes               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::delivery::is_street_eligible;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{OrderDraft, PickupType, StoreSettings};
use crate::{MAX_ITEM_QUANTITY, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the customer name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most MAX_NAME_LEN characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an "HH:MM" slot string.
pub fn validate_slot_format(time: &str) -> ValidationResult<()> {
    let valid = time.len() == 5
        && time.is_ascii()
        && time.as_bytes()[2] == b':'
        && time[..2].parse::<u32>().map(|h| h < 24).unwrap_or(false)
        && time[3..].parse::<u32>().map(|m| m < 60).unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "scheduled_time".to_string(),
            reason: "expected HH:MM".to_string(),
        })
    }
}

// =============================================================================
// Draft Validation
// =============================================================================

/// Validates a draft order against the current store settings.
///
/// This is the synchronous gate of the error taxonomy: everything rejected
/// here is a blocking user-facing message, and nothing has touched the
/// database yet.
///
/// ## Checks
/// - customer name present
/// - at least one line item, every quantity in bounds
/// - scheduled pickup: a well-formed slot string is present
/// - delivery: address fields present, neighborhood known, street eligible
pub fn validate_order_draft(draft: &OrderDraft, settings: &StoreSettings) -> CoreResult<()> {
    validate_customer_name(&draft.customer_name)?;

    if draft.items.is_empty() {
        return Err(ValidationError::EmptyOrder.into());
    }
    for item in &draft.items {
        validate_quantity(item.quantity)?;
    }

    if draft.pickup_type == PickupType::Scheduled {
        match draft.scheduled_time.as_deref() {
            None => {
                return Err(ValidationError::Required {
                    field: "scheduled_time".to_string(),
                }
                .into())
            }
            Some(time) => validate_slot_format(time)?,
        }
    }

    if draft.pickup_type == PickupType::Delivery {
        let address = draft.delivery_address.as_ref().ok_or(ValidationError::Required {
            field: "delivery_address".to_string(),
        })?;

        if address.street.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "street".to_string(),
            }
            .into());
        }
        if address.number.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "number".to_string(),
            }
            .into());
        }

        let neighborhood = settings
            .neighborhoods
            .iter()
            .find(|n| n.id == address.neighborhood_id)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "neighborhood_id".to_string(),
                reason: "unknown neighborhood".to_string(),
            })?;

        if !is_street_eligible(
            &address.street,
            Some(neighborhood),
            draft.pickup_type,
            settings.street_validation_enabled,
        ) {
            return Err(CoreError::StreetNotEligible {
                street: address.street.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
