//! # brasa-core: Pure Business Logic for Brasa POS
//!
//! This crate is the **heart** of Brasa POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brasa POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Storefront / Staff Panel (TypeScript)                │   │
//! │  │    Menu ──► Cart ──► Checkout      Kanban ──► Cashier           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     brasa-service                               │   │
//! │  │    OrderService, MenuService, CashierService, SettingsService   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brasa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐ │   │
//! │  │   │  types  │ │ pricing │ │lifecycle │ │ cashier │ │ slots  │ │   │
//! │  │   │  Order  │ │  Money  │ │ advance  │ │summarize│ │ gen    │ │   │
//! │  │   │ Product │ │ totals  │ │ cancel   │ │ ledger  │ │        │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    brasa-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, CashierLog, StoreSettings, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`pricing`] - Line totals, subtotals, delivery fee, grand total
//! - [`delivery`] - Street allow-list eligibility
//! - [`lifecycle`] - Order status state machine
//! - [`cashier`] - Session accounting and ledger entries
//! - [`slots`] - Pickup slot generation
//! - [`validation`] - Draft-order validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use brasa_core::money::Money;
//! use brasa_core::types::PickupType;
//! use brasa_core::pricing::delivery_fee;
//!
//! // Create money from centavos (never from floats!)
//! let price = Money::from_cents(1890); // R$ 18,90
//!
//! // Pickup orders never pay a delivery fee
//! assert_eq!(delivery_fee(PickupType::Immediate, None), Money::zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cashier;
pub mod delivery;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod slots;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use brasa_core::Money` instead of
// `use brasa_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 100 instead of 10). A single
/// household order never legitimately needs more.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Maximum customer name length.
pub const MAX_NAME_LEN: usize = 120;
