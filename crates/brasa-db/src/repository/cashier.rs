//! # Cashier Ledger Repository
//!
//! Append-only persistence for cashier open/close entries. Entries are never
//! updated or deleted; a close entry's summary column freezes the session
//! breakdown forever.
//!
//! Session transitions are serialized here, not in the caller: the
//! `is_cashier_open` flag flips via a conditional `UPDATE` in the same
//! transaction that appends the ledger entry, so two concurrent opens can
//! never both write an `Open` row.

use sqlx::SqlitePool;
use tracing::debug;

use brasa_core::{CashierLog, CashierLogKind, SessionSummary, StoreSettings};
use chrono::{DateTime, Utc};

use crate::error::DbResult;

/// Repository for cashier ledger operations.
#[derive(Debug, Clone)]
pub struct CashierRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    id: String,
    kind: CashierLogKind,
    timestamp: DateTime<Utc>,
    value_cents: i64,
    responsible: String,
    note: Option<String>,
    summary: Option<String>,
}

impl LogRow {
    fn into_log(self) -> DbResult<CashierLog> {
        let summary: Option<SessionSummary> = match self.summary {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };

        Ok(CashierLog {
            id: self.id,
            kind: self.kind,
            timestamp: self.timestamp,
            value_cents: self.value_cents,
            responsible: self.responsible,
            note: self.note,
            summary,
        })
    }
}

const SELECT_LOG: &str = "SELECT id, kind, timestamp, value_cents, responsible, note, summary \
                          FROM cashier_logs";

const INSERT_LOG: &str = "INSERT INTO cashier_logs (\
                              id, kind, timestamp, value_cents, responsible, note, summary\
                          ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

impl CashierRepository {
    /// Creates a new CashierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashierRepository { pool }
    }

    /// Appends a ledger entry.
    pub async fn insert(&self, log: &CashierLog) -> DbResult<()> {
        debug!(id = %log.id, kind = ?log.kind, "Appending cashier log");

        let summary_json = log.summary.as_ref().map(serde_json::to_string).transpose()?;

        sqlx::query(INSERT_LOG)
            .bind(&log.id)
            .bind(log.kind)
            .bind(log.timestamp)
            .bind(log.value_cents)
            .bind(&log.responsible)
            .bind(&log.note)
            .bind(&summary_json)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Opens a session: flips `is_cashier_open` and appends the `Open` entry
    /// in one transaction.
    ///
    /// Returns `false` (writing nothing) when a session is already open.
    pub async fn open_session(&self, log: &CashierLog) -> DbResult<bool> {
        self.transition(log, true).await
    }

    /// Closes the session: flips the flag back and appends the `Close` entry
    /// in one transaction.
    ///
    /// Returns `false` (writing nothing) when no session is open.
    pub async fn close_session(&self, log: &CashierLog) -> DbResult<bool> {
        self.transition(log, false).await
    }

    async fn transition(&self, log: &CashierLog, open: bool) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        // The flag lives in the settings JSON blob; the singleton row must
        // exist for the conditional UPDATE below to see it.
        let defaults = serde_json::to_string(&StoreSettings::default())?;
        sqlx::query("INSERT OR IGNORE INTO store_settings (id, data) VALUES (1, ?1)")
            .bind(&defaults)
            .execute(&mut *tx)
            .await?;

        // Guard and flip in one statement: a concurrent second open (or a
        // close with no open session) matches zero rows.
        let flipped = sqlx::query(
            "UPDATE store_settings \
             SET data = json_set(data, '$.is_cashier_open', json(?1)) \
             WHERE id = 1 \
               AND COALESCE(json_extract(data, '$.is_cashier_open'), 0) = ?2",
        )
        .bind(if open { "true" } else { "false" })
        .bind(if open { 0_i64 } else { 1_i64 })
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            return Ok(false);
        }

        let summary_json = log.summary.as_ref().map(serde_json::to_string).transpose()?;
        sqlx::query(INSERT_LOG)
            .bind(&log.id)
            .bind(log.kind)
            .bind(log.timestamp)
            .bind(log.value_cents)
            .bind(&log.responsible)
            .bind(&log.note)
            .bind(&summary_json)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(id = %log.id, open, "Cashier session transition committed");
        Ok(true)
    }

    /// Returns the most recent `Open` entry, if any.
    ///
    /// This anchors the current session: completed orders created after its
    /// timestamp belong to the session.
    pub async fn last_open(&self) -> DbResult<Option<CashierLog>> {
        let row: Option<LogRow> = sqlx::query_as(&format!(
            "{SELECT_LOG} WHERE kind = 'open' ORDER BY timestamp DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(LogRow::into_log).transpose()
    }

    /// Lists ledger entries, newest first.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<CashierLog>> {
        let rows: Vec<LogRow> = sqlx::query_as(&format!(
            "{SELECT_LOG} ORDER BY timestamp DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LogRow::into_log).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use uuid::Uuid;

    fn log(kind: CashierLogKind, at: DateTime<Utc>) -> CashierLog {
        CashierLog {
            id: Uuid::new_v4().to_string(),
            kind,
            timestamp: at,
            value_cents: 5000,
            responsible: "Admin".to_string(),
            note: None,
            summary: None,
        }
    }

    #[tokio::test]
    async fn test_last_open_skips_close_entries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashier();

        let t0 = Utc::now();
        let open = log(CashierLogKind::Open, t0);
        repo.insert(&open).await.unwrap();
        repo.insert(&log(CashierLogKind::Close, t0 + Duration::hours(8)))
            .await
            .unwrap();

        let last = repo.last_open().await.unwrap().unwrap();
        assert_eq!(last.id, open.id);
    }

    #[tokio::test]
    async fn test_last_open_none_on_empty_ledger() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.cashier().last_open().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_session_writes_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashier();

        assert!(repo.open_session(&log(CashierLogKind::Open, Utc::now())).await.unwrap());
        // second open loses the conditional flip and appends nothing
        assert!(!repo.open_session(&log(CashierLogKind::Open, Utc::now())).await.unwrap());

        assert_eq!(repo.list(10).await.unwrap().len(), 1);
        assert!(db.settings().get().await.unwrap().is_cashier_open);
    }

    #[tokio::test]
    async fn test_close_session_requires_open() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashier();

        assert!(!repo.close_session(&log(CashierLogKind::Close, Utc::now())).await.unwrap());
        assert!(repo.list(10).await.unwrap().is_empty());

        assert!(repo.open_session(&log(CashierLogKind::Open, Utc::now())).await.unwrap());
        assert!(repo.close_session(&log(CashierLogKind::Close, Utc::now())).await.unwrap());
        assert!(!db.settings().get().await.unwrap().is_cashier_open);
    }

    #[tokio::test]
    async fn test_summary_json_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.cashier();

        let mut close = log(CashierLogKind::Close, Utc::now());
        close.summary = Some(SessionSummary {
            pix_cents: 4580,
            total_orders: 1,
            total_sales_cents: 4580,
            ..SessionSummary::default()
        });
        repo.insert(&close).await.unwrap();

        let logs = repo.list(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        let summary = logs[0].summary.as_ref().unwrap();
        assert_eq!(summary.pix_cents, 4580);
        assert_eq!(summary.total_orders, 1);
    }
}
