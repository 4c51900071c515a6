//! # Settings Service
//!
//! Store configuration and the things derived from it: the open/closed
//! toggle, delivery neighborhoods, and the pickup slots offered at checkout.

use chrono::{DateTime, Utc};
use tracing::info;

use brasa_core::slots::{generate_slots, SlotConfig};
use brasa_core::{Neighborhood, StoreSettings};
use brasa_db::Database;

use crate::error::ServiceResult;

/// Store settings service.
#[derive(Debug, Clone)]
pub struct SettingsService {
    db: Database,
}

impl SettingsService {
    /// Creates a new SettingsService.
    pub fn new(db: Database) -> Self {
        SettingsService { db }
    }

    /// Loads the store settings (neighborhoods hydrated).
    pub async fn get(&self) -> ServiceResult<StoreSettings> {
        Ok(self.db.settings().get().await?)
    }

    /// Saves the store settings.
    pub async fn save(&self, settings: &StoreSettings) -> ServiceResult<()> {
        self.db.settings().save(settings).await?;
        Ok(())
    }

    /// Flips the storefront open/closed toggle.
    pub async fn set_store_open(&self, open: bool) -> ServiceResult<()> {
        let mut settings = self.db.settings().get().await?;
        settings.is_open = open;
        self.db.settings().save(&settings).await?;

        info!(open, "Store toggle changed");
        Ok(())
    }

    /// Pickup slots currently offered at checkout.
    ///
    /// Recomputed against the wall clock on every call; the result must not
    /// be cached across minute boundaries.
    pub async fn available_slots(&self) -> ServiceResult<Vec<String>> {
        self.available_slots_at(Utc::now()).await
    }

    /// Slot sequence as of a given instant. Split out for tests.
    pub async fn available_slots_at(&self, now: DateTime<Utc>) -> ServiceResult<Vec<String>> {
        let settings = self.db.settings().get().await?;
        let config = SlotConfig {
            interval_minutes: settings.scheduling_interval_minutes,
            ..SlotConfig::default()
        };
        Ok(generate_slots(now, config))
    }

    // =========================================================================
    // Neighborhoods
    // =========================================================================

    /// Lists delivery neighborhoods.
    pub async fn list_neighborhoods(&self) -> ServiceResult<Vec<Neighborhood>> {
        Ok(self.db.neighborhoods().list().await?)
    }

    /// Creates or edits a neighborhood (and its street allow-list).
    pub async fn upsert_neighborhood(&self, neighborhood: &Neighborhood) -> ServiceResult<()> {
        self.db.neighborhoods().upsert(neighborhood).await?;
        Ok(())
    }

    /// Removes a neighborhood from the delivery area.
    pub async fn delete_neighborhood(&self, id: &str) -> ServiceResult<()> {
        self.db.neighborhoods().delete(id).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use brasa_db::DbConfig;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_slots_honor_configured_interval() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = SettingsService::new(db);

        let mut settings = StoreSettings::default();
        settings.scheduling_interval_minutes = 30;
        service.save(&settings).await.unwrap();

        let now = Utc.with_ymd_and_hms(2026, 8, 30, 10, 7, 0).unwrap();
        let slots = service.available_slots_at(now).await.unwrap();

        // threshold 10:37 on a 30-min grid → first offer 11:00
        assert_eq!(slots[0], "11:00");
        assert_eq!(slots[1], "11:30");
        assert!(slots.len() <= 20);
    }

    #[tokio::test]
    async fn test_store_toggle_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = SettingsService::new(db);

        service.set_store_open(false).await.unwrap();
        assert!(!service.get().await.unwrap().is_open);

        service.set_store_open(true).await.unwrap();
        assert!(service.get().await.unwrap().is_open);
    }
}
