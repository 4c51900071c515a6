//! # brasa-db: Database Layer for Brasa POS
//!
//! This crate provides database access for the Brasa POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brasa POS Data Flow                              │
//! │                                                                         │
//! │  Service call (place_order, close_cashier, ...)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     brasa-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (order.rs,   │    │  (embedded)  │  │   │
//! │  │   │               │    │   product.rs, │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│   cashier.rs  │    │ 001_init.sql │  │   │
//! │  │   │ OrderEvents   │    │   ...)        │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                    ./data/brasa.db (WAL)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (order, product, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brasa_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let config = DbConfig::new("path/to/brasa.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let orders = db.orders().list_recent(50).await?;
//!
//! // Subscribe to order changes
//! let mut rx = db.subscribe_orders();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cashier::CashierRepository;
pub use repository::neighborhood::NeighborhoodRepository;
pub use repository::order::{OrderEvent, OrderRepository};
pub use repository::product::ProductRepository;
pub use repository::settings::SettingsRepository;
