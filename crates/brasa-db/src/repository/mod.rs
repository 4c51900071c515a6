//! # Repository Module
//!
//! Database repository implementations for Brasa POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.orders().list_recent(50)                                   │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create(&self, order)                                              │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── update_status(&self, id, status)                                  │
//! │  └── list_recent(&self, limit)                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Products, extras, and categories
//! - [`order::OrderRepository`] - Order persistence and numbering
//! - [`neighborhood::NeighborhoodRepository`] - Delivery neighborhoods
//! - [`cashier::CashierRepository`] - Cashier ledger entries
//! - [`settings::SettingsRepository`] - Store settings singleton

pub mod cashier;
pub mod neighborhood;
pub mod order;
pub mod product;
pub mod settings;
