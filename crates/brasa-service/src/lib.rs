//! # brasa-service: Service Layer for Brasa POS
//!
//! The surface every caller talks to. Composes brasa-core business rules
//! with brasa-db persistence into complete workflows.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brasa POS Call Flow                              │
//! │                                                                         │
//! │  Storefront checkout          Staff panel             Admin panel       │
//! │       │                          │                        │             │
//! │       ▼                          ▼                        ▼             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  brasa-service (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  OrderService      place / advance / cancel / pay / reschedule │   │
//! │  │  MenuService       products, extras, categories, repricing     │   │
//! │  │  CashierService    open / summary / close                      │   │
//! │  │  SettingsService   settings, toggle, slots, neighborhoods      │   │
//! │  │  notification      confirmation text + WhatsApp link           │   │
//! │  └───────────────┬───────────────────────────┬─────────────────────┘   │
//! │                  │                           │                          │
//! │                  ▼                           ▼                          │
//! │            brasa-core                   brasa-db                        │
//! │          (pure rules)               (SQLite, events)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brasa_db::DbConfig;
//! use brasa_service::AppServices;
//!
//! let services = AppServices::new(DbConfig::new("./data/brasa.db")).await?;
//!
//! let order = services.orders().place_order(draft).await?;
//! let slots = services.settings().available_slots().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cashier;
pub mod error;
pub mod menu;
pub mod notification;
pub mod orders;
pub mod settings;

// =============================================================================
// Re-exports
// =============================================================================

pub use cashier::CashierService;
pub use error::{ServiceError, ServiceResult};
pub use menu::MenuService;
pub use notification::{order_confirmation, OrderMessage};
pub use orders::OrderService;
pub use settings::SettingsService;

use brasa_db::{Database, DbConfig};

/// Bundle of all services over one shared database handle.
///
/// Cheap to clone; every embedding (HTTP server, desktop shell, tests)
/// holds one of these.
#[derive(Debug, Clone)]
pub struct AppServices {
    db: Database,
}

impl AppServices {
    /// Opens the database (running migrations) and wires up the services.
    pub async fn new(config: DbConfig) -> ServiceResult<Self> {
        let db = Database::new(config).await?;
        Ok(AppServices { db })
    }

    /// Wraps an already-open database handle.
    pub fn from_database(db: Database) -> Self {
        AppServices { db }
    }

    /// Order workflows.
    pub fn orders(&self) -> OrderService {
        OrderService::new(self.db.clone())
    }

    /// Menu administration.
    pub fn menu(&self) -> MenuService {
        MenuService::new(self.db.clone())
    }

    /// Cashier sessions.
    pub fn cashier(&self) -> CashierService {
        CashierService::new(self.db.clone())
    }

    /// Store settings and scheduling.
    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.db.clone())
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_services_share_one_database() {
        let services = AppServices::new(DbConfig::in_memory()).await.unwrap();

        // settings written through one service are visible to the others
        services.settings().set_store_open(false).await.unwrap();
        let settings = services.settings().get().await.unwrap();
        assert!(!settings.is_open);

        assert!(services.database().health_check().await);
    }
}
