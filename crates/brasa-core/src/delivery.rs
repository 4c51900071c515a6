//! # Delivery Eligibility
//!
//! Determines whether a typed street matches a neighborhood's registered
//! street allow-list.
//!
//! ## Matching Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User types: "general osorio"                                           │
//! │  Allow-list: ["Rua General Osório"]                                     │
//! │                                                                         │
//! │  1. Lowercase + trim both sides                                         │
//! │  2. Bidirectional substring:                                            │
//! │     input ⊆ allowed  OR  allowed ⊆ input                                │
//! │                                                                         │
//! │  "general osorio" is not a substring of "rua general osório"            │
//! │  (accent differs) → NOT eligible. "osório" would be. Matching is on     │
//! │  raw characters; no accent folding.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bidirectional match is intentionally permissive so abbreviated or
//! partial street names typed at checkout still pass ("Rua A" matches
//! "Rua Augusto" too - an accepted usability trade-off).

use crate::types::{Neighborhood, PickupType};

/// Inputs shorter than this are treated as "still typing" and not rejected.
const MIN_STREET_INPUT_LEN: usize = 3;

/// Checks whether the typed street is eligible for delivery in the selected
/// neighborhood.
///
/// Returns `true` unconditionally when:
/// - street validation is disabled in settings
/// - the order is not a delivery order
/// - no neighborhood has been selected yet
/// - the input is shorter than 3 characters
/// - the neighborhood has no allow-list configured (empty = no restriction)
///
/// Otherwise both sides are lowercased and trimmed, and the input is
/// eligible iff it is a substring of some allowed entry OR some allowed
/// entry is a substring of the input.
pub fn is_street_eligible(
    street: &str,
    neighborhood: Option<&Neighborhood>,
    pickup_type: PickupType,
    validation_enabled: bool,
) -> bool {
    if !validation_enabled {
        return true;
    }
    if pickup_type != PickupType::Delivery {
        return true;
    }
    let Some(neighborhood) = neighborhood else {
        return true;
    };
    // character count, not bytes: accented input must get the same grace
    if street.chars().count() < MIN_STREET_INPUT_LEN {
        return true;
    }
    if neighborhood.allowed_streets.is_empty() {
        return true;
    }

    let input = street.to_lowercase();
    let input = input.trim();

    neighborhood.allowed_streets.iter().any(|s| {
        let allowed = s.to_lowercase();
        let allowed = allowed.trim();
        input.contains(allowed) || allowed.contains(input)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
