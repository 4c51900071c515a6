//! # Cashier Service
//!
//! Session workflows over the cashier ledger: open with a float, watch the
//! running summary, close with a frozen breakdown.
//!
//! ## Session Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open_session ──► Open entry appended, is_cashier_open = true           │
//! │       │                                                                 │
//! │       │   current_summary() = completed orders created after the        │
//! │       │   latest Open entry, bucketed by method and channel             │
//! │       ▼                                                                 │
//! │  close_session ──► Close entry freezes the summary,                     │
//! │                    is_cashier_open = false                              │
//! │                                                                         │
//! │  The summary lives on the Close entry forever; later edits to orders    │
//! │  never rewrite an already-closed session.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tracing::info;

use brasa_core::{cashier, CashierLog, CoreError, SessionSummary};
use brasa_db::Database;

use crate::error::ServiceResult;

/// Cashier session service.
#[derive(Debug, Clone)]
pub struct CashierService {
    db: Database,
}

impl CashierService {
    /// Creates a new CashierService.
    pub fn new(db: Database) -> Self {
        CashierService { db }
    }

    /// Opens a cashier session with the given opening float.
    ///
    /// Rejected while a session is already open.
    pub async fn open_session(
        &self,
        value_cents: i64,
        responsible: &str,
        note: Option<String>,
    ) -> ServiceResult<CashierLog> {
        let log = cashier::open_log(value_cents, responsible, note, Utc::now());

        // The flag flip and the ledger append are one transaction in the
        // store; a lost race surfaces here as "already open".
        if !self.db.cashier().open_session(&log).await? {
            return Err(CoreError::CashierState {
                state: "already open",
            }
            .into());
        }

        info!(responsible = %responsible, float = value_cents, "Cashier opened");
        Ok(log)
    }

    /// Closes the current session, freezing its summary on the ledger.
    ///
    /// Rejected while no session is open.
    pub async fn close_session(&self, responsible: &str) -> ServiceResult<CashierLog> {
        let summary = self.current_summary().await?;
        let log = cashier::close_log(summary, responsible, Utc::now());

        if !self.db.cashier().close_session(&log).await? {
            return Err(CoreError::CashierState { state: "not open" }.into());
        }

        info!(
            responsible = %responsible,
            total = log.value_cents,
            "Cashier closed"
        );
        Ok(log)
    }

    /// Running summary of the current session.
    ///
    /// Completed orders created after the latest `Open` ledger entry; with
    /// an empty ledger, every completed order counts.
    pub async fn current_summary(&self) -> ServiceResult<SessionSummary> {
        let last_open = self.db.cashier().last_open().await?;

        let since = last_open
            .as_ref()
            .map(|log| log.timestamp)
            .unwrap_or(DateTime::UNIX_EPOCH);
        let orders = self.db.orders().list_since(since).await?;

        let session = cashier::session_orders(&orders, last_open.as_ref());
        Ok(cashier::summarize(session.into_iter()))
    }

    /// Lists ledger entries, newest first.
    pub async fn logs(&self, limit: i64) -> ServiceResult<Vec<CashierLog>> {
        Ok(self.db.cashier().list(limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::orders::OrderService;
    use brasa_core::{
        CashierLogKind, Category, LineItem, OrderDraft, OrderOrigin, PaymentMethod, PickupType,
        Product, StoreSettings,
    };
    use brasa_db::DbConfig;

    async fn seeded_db() -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.products()
            .insert_category(&Category {
                id: "c1".to_string(),
                name: "Lanches".to_string(),
                sort_order: 0,
            })
            .await
            .unwrap();

        let product = Product {
            id: "p1".to_string(),
            name: "X-Burger".to_string(),
            description: String::new(),
            price_cents: 1000,
            cost_price_cents: None,
            is_active: true,
            category_id: "c1".to_string(),
            image_url: None,
            extras: Vec::new(),
        };
        db.products().insert(&product).await.unwrap();
        db.settings().save(&StoreSettings::default()).await.unwrap();

        (db, product)
    }

    fn draft(product: &Product, method: PaymentMethod) -> OrderDraft {
        OrderDraft {
            origin: OrderOrigin::Counter,
            pickup_type: PickupType::Immediate,
            scheduled_time: None,
            customer_name: "Ana".to_string(),
            customer_phone: None,
            table_number: None,
            delivery_address: None,
            items: vec![LineItem {
                id: "i1".to_string(),
                product: product.clone(),
                quantity: 1,
                selected_extras: Vec::new(),
                observation: String::new(),
            }],
            general_observation: String::new(),
            internal_observation: None,
            payment_method: Some(method),
        }
    }

    async fn complete(orders: &OrderService, id: &str) {
        orders.advance(id).await.unwrap();
        orders.advance(id).await.unwrap();
        orders.advance(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_double_open_rejected() {
        let (db, _) = seeded_db().await;
        let service = CashierService::new(db);

        service.open_session(5000, "Admin", None).await.unwrap();
        let err = service.open_session(5000, "Admin", None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::CashierState { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_opens_admit_exactly_one() {
        let (db, _) = seeded_db().await;
        let service = CashierService::new(db);

        let (a, b) = tokio::join!(
            service.open_session(5000, "Ana", None),
            service.open_session(5000, "Bia", None),
        );

        // one winner, one CashierState loser - never two Open entries
        assert!(a.is_ok() ^ b.is_ok());
        let logs = service.logs(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].kind, CashierLogKind::Open);
    }

    #[tokio::test]
    async fn test_close_without_open_rejected() {
        let (db, _) = seeded_db().await;
        let service = CashierService::new(db);

        let err = service.close_session("Admin").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::CashierState { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_counts_only_completed_after_open() {
        let (db, product) = seeded_db().await;
        let orders = OrderService::new(db.clone());
        let service = CashierService::new(db.clone());

        // Completed before the session opens: excluded.
        let before = orders
            .place_order(draft(&product, PaymentMethod::Cash))
            .await
            .unwrap();
        complete(&orders, &before.id).await;

        // created_at granularity is sub-second; a tiny pause keeps the
        // pre-open order strictly before the open timestamp.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        service.open_session(5000, "Admin", None).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        // In session: one completed pix order.
        let in_session = orders
            .place_order(draft(&product, PaymentMethod::Pix))
            .await
            .unwrap();
        complete(&orders, &in_session.id).await;

        // Not completed: excluded.
        orders
            .place_order(draft(&product, PaymentMethod::Pix))
            .await
            .unwrap();

        let summary = service.current_summary().await.unwrap();
        assert_eq!(summary.total_orders, 1);
        assert_eq!(summary.total_sales_cents, 1000);
        assert_eq!(summary.pix_cents, 1000);
        assert_eq!(summary.cash_cents, 0);
    }

    #[tokio::test]
    async fn test_close_freezes_summary_and_flips_flag() {
        let (db, product) = seeded_db().await;
        let orders = OrderService::new(db.clone());
        let service = CashierService::new(db.clone());

        service.open_session(5000, "Admin", None).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let order = orders
            .place_order(draft(&product, PaymentMethod::Debit))
            .await
            .unwrap();
        complete(&orders, &order.id).await;

        let close = service.close_session("Admin").await.unwrap();
        assert_eq!(close.kind, CashierLogKind::Close);
        assert_eq!(close.value_cents, 1000);
        assert_eq!(close.summary.as_ref().unwrap().debit_cents, 1000);

        let settings = db.settings().get().await.unwrap();
        assert!(!settings.is_cashier_open);

        // ledger now holds open + close, newest first
        let logs = service.logs(10).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].kind, CashierLogKind::Close);
    }
}
