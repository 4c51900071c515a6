//! # Neighborhood Repository
//!
//! Database operations for delivery neighborhoods and their street
//! allow-lists. The allow-list is a JSON array column: it is only ever read
//! whole and matched in memory, never queried per street.

use sqlx::SqlitePool;

use brasa_core::Neighborhood;

use crate::error::{DbError, DbResult};

/// Repository for neighborhood operations.
#[derive(Debug, Clone)]
pub struct NeighborhoodRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct NeighborhoodRow {
    id: String,
    name: String,
    delivery_fee_cents: i64,
    estimated_distance_km: f64,
    allowed_streets: String,
}

impl NeighborhoodRow {
    fn into_neighborhood(self) -> DbResult<Neighborhood> {
        Ok(Neighborhood {
            id: self.id,
            name: self.name,
            delivery_fee_cents: self.delivery_fee_cents,
            estimated_distance_km: self.estimated_distance_km,
            allowed_streets: serde_json::from_str(&self.allowed_streets)?,
        })
    }
}

impl NeighborhoodRepository {
    /// Creates a new NeighborhoodRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NeighborhoodRepository { pool }
    }

    /// Lists all neighborhoods in name order.
    pub async fn list(&self) -> DbResult<Vec<Neighborhood>> {
        let rows: Vec<NeighborhoodRow> = sqlx::query_as(
            "SELECT id, name, delivery_fee_cents, estimated_distance_km, \
             allowed_streets FROM neighborhoods ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(NeighborhoodRow::into_neighborhood)
            .collect()
    }

    /// Gets a neighborhood by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Neighborhood>> {
        let row: Option<NeighborhoodRow> = sqlx::query_as(
            "SELECT id, name, delivery_fee_cents, estimated_distance_km, \
             allowed_streets FROM neighborhoods WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(NeighborhoodRow::into_neighborhood).transpose()
    }

    /// Inserts or replaces a neighborhood.
    ///
    /// Upsert: the admin form doesn't distinguish create from edit.
    pub async fn upsert(&self, neighborhood: &Neighborhood) -> DbResult<()> {
        let streets_json = serde_json::to_string(&neighborhood.allowed_streets)?;

        sqlx::query(
            r#"
            INSERT INTO neighborhoods (
                id, name, delivery_fee_cents, estimated_distance_km, allowed_streets
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                delivery_fee_cents = excluded.delivery_fee_cents,
                estimated_distance_km = excluded.estimated_distance_km,
                allowed_streets = excluded.allowed_streets
            "#,
        )
        .bind(&neighborhood.id)
        .bind(&neighborhood.name)
        .bind(neighborhood.delivery_fee_cents)
        .bind(neighborhood.estimated_distance_km)
        .bind(&streets_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a neighborhood.
    ///
    /// Safe for order history: delivery orders carry a frozen fee/address
    /// snapshot, not a live reference.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM neighborhoods WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Neighborhood", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn centro() -> Neighborhood {
        Neighborhood {
            id: "n1".to_string(),
            name: "Centro".to_string(),
            delivery_fee_cents: 500,
            estimated_distance_km: 2.2,
            allowed_streets: vec![
                "Rua General Osório".to_string(),
                "Av. Brasil".to_string(),
            ],
        }
    }

    #[tokio::test]
    async fn test_upsert_round_trips_allow_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.neighborhoods();

        repo.upsert(&centro()).await.unwrap();

        let loaded = repo.get_by_id("n1").await.unwrap().unwrap();
        assert_eq!(loaded.allowed_streets.len(), 2);
        assert_eq!(loaded.allowed_streets[0], "Rua General Osório");
        assert_eq!(loaded.delivery_fee_cents, 500);
    }

    #[tokio::test]
    async fn test_upsert_is_an_update_on_conflict() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.neighborhoods();

        repo.upsert(&centro()).await.unwrap();

        let mut edited = centro();
        edited.delivery_fee_cents = 700;
        edited.allowed_streets.clear();
        repo.upsert(&edited).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].delivery_fee_cents, 700);
        assert!(all[0].allowed_streets.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.neighborhoods().delete("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
