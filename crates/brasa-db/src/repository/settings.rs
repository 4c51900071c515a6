//! # Store Settings Repository
//!
//! Persistence for the store settings singleton.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store_settings (single row, id = 1)                                    │
//! │    data: JSON StoreSettings with neighborhoods = []                     │
//! │                                                                         │
//! │  neighborhoods (own table)                                              │
//! │    source of truth; hydrated into settings on every read                │
//! │                                                                         │
//! │  get() → defaults when the row is missing OR unparseable - the store    │
//! │  must come up even if the settings row is corrupted.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, warn};

use brasa_core::StoreSettings;

use crate::error::DbResult;

/// Repository for the store settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the store settings, hydrating neighborhoods from their table.
    ///
    /// Falls back to [`StoreSettings::default`] when the row is missing or
    /// malformed - never errors out of a bad settings row.
    pub async fn get(&self) -> DbResult<StoreSettings> {
        let json: Option<String> =
            sqlx::query_scalar("SELECT data FROM store_settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        let mut settings = match json {
            Some(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(%err, "Malformed settings row, using defaults");
                    StoreSettings::default()
                }
            },
            None => StoreSettings::default(),
        };

        settings.neighborhoods = crate::repository::neighborhood::NeighborhoodRepository::new(
            self.pool.clone(),
        )
        .list()
        .await?;

        Ok(settings)
    }

    /// Saves the store settings.
    ///
    /// Neighborhoods are stripped before writing: they live in their own
    /// table and are managed through [`NeighborhoodRepository`]. This keeps
    /// a single source of truth for the allow-lists.
    ///
    /// [`NeighborhoodRepository`]: crate::repository::neighborhood::NeighborhoodRepository
    pub async fn save(&self, settings: &StoreSettings) -> DbResult<()> {
        let mut to_store = settings.clone();
        to_store.neighborhoods = Vec::new();
        let json = serde_json::to_string(&to_store)?;

        sqlx::query(
            r#"
            INSERT INTO store_settings (id, data) VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(&json)
        .execute(&self.pool)
        .await?;

        debug!("Settings saved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
