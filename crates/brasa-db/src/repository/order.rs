//! # Order Repository
//!
//! Order persistence, sequential numbering, and change notifications.
//!
//! ## Order Numbering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Atomic Order Numbering                                 │
//! │                                                                         │
//! │  create(order)                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ├── UPDATE order_counter SET value = value + 1 RETURNING value   │
//! │       │   (the row lock serializes concurrent checkouts)               │
//! │       │                                                                 │
//! │       ├── INSERT INTO orders (..., number, ...)                        │
//! │       │                                                                 │
//! │  COMMIT                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  broadcast OrderEvent::Created ──► staff panels re-fetch               │
//! │                                                                         │
//! │  Two checkouts can never observe the same counter value, so numbers    │
//! │  are unique and strictly increasing. Gaps only appear when an insert   │
//! │  fails after the counter bump - acceptable for a business sequence.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON Columns
//! Line items and the delivery snapshot are stored as JSON TEXT: they are
//! frozen copies, only ever read back whole, never queried field-by-field.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::debug;

use brasa_core::{
    DeliveryInfo, LineItem, Order, OrderOrigin, OrderStatus, PaymentMethod, PaymentStatus,
    PickupType,
};

use crate::error::{DbError, DbResult};

// =============================================================================
// Change Notifications
// =============================================================================

/// A change to the orders table, broadcast to subscribed panels.
///
/// Events are hints to re-fetch, not a replayable log: a lagged receiver
/// should reload the order list instead of reconstructing missed events.
#[derive(Debug, Clone)]
pub enum OrderEvent {
    /// A new order was placed.
    Created { id: String, number: i64 },
    /// An existing order changed (status, payment, print flag, slot).
    Updated { id: String },
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw database row; JSON columns still serialized.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    number: i64,
    origin: OrderOrigin,
    pickup_type: PickupType,
    scheduled_time: Option<String>,
    customer_name: String,
    customer_phone: Option<String>,
    table_number: Option<String>,
    delivery_info: Option<String>,
    items: String,
    general_observation: String,
    internal_observation: Option<String>,
    status: OrderStatus,
    payment_method: Option<PaymentMethod>,
    payment_status: PaymentStatus,
    total_cents: i64,
    created_at: DateTime<Utc>,
    is_printed: bool,
}

impl OrderRow {
    fn into_order(self) -> DbResult<Order> {
        let items: Vec<LineItem> = serde_json::from_str(&self.items)?;
        let delivery_info: Option<DeliveryInfo> = match self.delivery_info {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };

        Ok(Order {
            id: self.id,
            number: self.number,
            origin: self.origin,
            pickup_type: self.pickup_type,
            scheduled_time: self.scheduled_time,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            table_number: self.table_number,
            delivery_info,
            items,
            general_observation: self.general_observation,
            internal_observation: self.internal_observation,
            status: self.status,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            total_cents: self.total_cents,
            created_at: self.created_at,
            is_printed: self.is_printed,
        })
    }
}

const SELECT_ORDER: &str = r#"
    SELECT id, number, origin, pickup_type, scheduled_time,
           customer_name, customer_phone, table_number,
           delivery_info, items, general_observation, internal_observation,
           status, payment_method, payment_status,
           total_cents, created_at, is_printed
    FROM orders
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    events: broadcast::Sender<OrderEvent>,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool, events: broadcast::Sender<OrderEvent>) -> Self {
        OrderRepository { pool, events }
    }

    /// Persists a new order, assigning its sequential number.
    ///
    /// The `number` field of the argument is ignored; the counter row is
    /// bumped inside the insert transaction and the returned order carries
    /// the assigned number. The caller gets nothing back until the row is
    /// durably committed.
    pub async fn create(&self, mut order: Order) -> DbResult<Order> {
        let items_json = serde_json::to_string(&order.items)?;
        let delivery_json = order
            .delivery_info
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut tx = self.pool.begin().await?;

        let number: i64 = sqlx::query_scalar(
            "UPDATE order_counter SET value = value + 1 WHERE id = 1 RETURNING value",
        )
        .fetch_one(&mut *tx)
        .await?;

        order.number = number;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, number, origin, pickup_type, scheduled_time,
                customer_name, customer_phone, table_number,
                delivery_info, items, general_observation, internal_observation,
                status, payment_method, payment_status,
                total_cents, created_at, is_printed
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10, ?11, ?12,
                ?13, ?14, ?15,
                ?16, ?17, ?18
            )
            "#,
        )
        .bind(&order.id)
        .bind(order.number)
        .bind(order.origin)
        .bind(order.pickup_type)
        .bind(&order.scheduled_time)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&order.table_number)
        .bind(&delivery_json)
        .bind(&items_json)
        .bind(&order.general_observation)
        .bind(&order.internal_observation)
        .bind(order.status)
        .bind(order.payment_method)
        .bind(order.payment_status)
        .bind(order.total_cents)
        .bind(order.created_at)
        .bind(order.is_printed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = %order.id, number = order.number, "Order created");

        // Nobody listening is fine (e.g. storefront-only deployments).
        let _ = self.events.send(OrderEvent::Created {
            id: order.id.clone(),
            number: order.number,
        });

        Ok(order)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("{SELECT_ORDER} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Lists the most recent orders, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} ORDER BY created_at DESC, number DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Lists orders created after the given instant, newest first.
    ///
    /// Used for cashier session accounting.
    pub async fn list_since(&self, since: DateTime<Utc>) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} WHERE created_at > ?1 ORDER BY created_at DESC, number DESC"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Lists orders with the given status, newest first.
    pub async fn list_by_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} WHERE status = ?1 ORDER BY created_at DESC, number DESC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Updates an order's status.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        debug!(id = %id, ?status, "Order status updated");
        let _ = self.events.send(OrderEvent::Updated { id: id.to_string() });
        Ok(())
    }

    /// Updates an order's payment status and, optionally, its method.
    ///
    /// Passing `None` for the method keeps whatever method is on record.
    pub async fn update_payment(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        payment_method: Option<PaymentMethod>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                payment_status = ?2,
                payment_method = COALESCE(?3, payment_method)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(payment_status)
        .bind(payment_method)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        let _ = self.events.send(OrderEvent::Updated { id: id.to_string() });
        Ok(())
    }

    /// Marks an order's kitchen ticket as printed.
    pub async fn mark_printed(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET is_printed = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        let _ = self.events.send(OrderEvent::Updated { id: id.to_string() });
        Ok(())
    }

    /// Updates the pickup slot of a scheduled order.
    pub async fn update_scheduled_time(&self, id: &str, time: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET scheduled_time = ?2 WHERE id = ?1")
            .bind(id)
            .bind(time)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        let _ = self.events.send(OrderEvent::Updated { id: id.to_string() });
        Ok(())
    }

    /// Lists orders that are still open (not in a terminal status),
    /// oldest first so the kanban reads top-down.
    pub async fn list_open(&self) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} WHERE status IN ('received', 'preparing', 'ready') \
             ORDER BY created_at ASC, number ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Rewrites an order's line items and total.
    ///
    /// Only the menu-edit repricing flow calls this, and only for orders
    /// that are still open; completed and cancelled orders are immutable.
    pub async fn update_items_and_total(
        &self,
        id: &str,
        items: &[LineItem],
        total_cents: i64,
    ) -> DbResult<()> {
        let items_json = serde_json::to_string(items)?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET items = ?2, total_cents = ?3
            WHERE id = ?1 AND status IN ('received', 'preparing', 'ready')
            "#,
        )
        .bind(id)
        .bind(&items_json)
        .bind(total_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Open order", id));
        }

        let _ = self.events.send(OrderEvent::Updated { id: id.to_string() });
        Ok(())
    }

    /// Counts orders that still reference the given product in their items.
    ///
    /// JSON scan; only used by admin flows, never on the hot path.
    pub async fn count_open_with_product(&self, product_id: &str) -> DbResult<i64> {
        let pattern = format!("%\"id\":\"{product_id}\"%");
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE status IN ('received', 'preparing', 'ready')
              AND items LIKE ?1
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    fn sample_order(total_cents: i64) -> Order {
        Order {
            id: Uuid::new_v4().to_string(),
            number: 0, // assigned by create()
            origin: OrderOrigin::Online,
            pickup_type: PickupType::Immediate,
            scheduled_time: None,
            customer_name: "Ana".to_string(),
            customer_phone: Some("11 99999-0000".to_string()),
            table_number: None,
            delivery_info: None,
            items: Vec::new(),
            general_observation: String::new(),
            internal_observation: None,
            status: OrderStatus::Received,
            payment_method: Some(PaymentMethod::Pix),
            payment_status: PaymentStatus::Pending,
            total_cents,
            created_at: Utc::now(),
            is_printed: false,
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_numbers() {
        let db = db().await;
        let repo = db.orders();

        let first = repo.create(sample_order(1000)).await.unwrap();
        let second = repo.create(sample_order(2000)).await.unwrap();

        assert_eq!(first.number, 1);
        assert_eq!(second.number, 2);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_json_columns() {
        let db = db().await;
        let repo = db.orders();

        let mut order = sample_order(5080);
        order.pickup_type = PickupType::Delivery;
        order.delivery_info = Some(DeliveryInfo {
            neighborhood_id: "n1".to_string(),
            street: "Rua General Osório".to_string(),
            number: "100".to_string(),
            complement: None,
            reference: Some("portão azul".to_string()),
            delivery_fee_cents: 500,
            estimated_minutes: 31,
        });

        let created = repo.create(order).await.unwrap();
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.number, created.number);
        assert_eq!(loaded.total_cents, 5080);
        let info = loaded.delivery_info.unwrap();
        assert_eq!(info.street, "Rua General Osório");
        assert_eq!(info.delivery_fee_cents, 500);
    }

    #[tokio::test]
    async fn test_update_status_and_not_found() {
        let db = db().await;
        let repo = db.orders();

        let order = repo.create(sample_order(1000)).await.unwrap();
        repo.update_status(&order.id, OrderStatus::Preparing)
            .await
            .unwrap();

        let loaded = repo.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Preparing);

        let err = repo
            .update_status("missing", OrderStatus::Ready)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_payment_keeps_method_when_none() {
        let db = db().await;
        let repo = db.orders();

        let order = repo.create(sample_order(1000)).await.unwrap();
        repo.update_payment(&order.id, PaymentStatus::Paid, None)
            .await
            .unwrap();

        let loaded = repo.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded.payment_status, PaymentStatus::Paid);
        assert_eq!(loaded.payment_method, Some(PaymentMethod::Pix));
    }

    #[tokio::test]
    async fn test_create_broadcasts_event() {
        let db = db().await;
        let mut rx = db.subscribe_orders();

        let order = db.orders().create(sample_order(1000)).await.unwrap();

        match rx.recv().await.unwrap() {
            OrderEvent::Created { id, number } => {
                assert_eq!(id, order.id);
                assert_eq!(number, order.number);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let db = db().await;
        let repo = db.orders();

        repo.create(sample_order(1000)).await.unwrap();
        repo.create(sample_order(2000)).await.unwrap();
        repo.create(sample_order(3000)).await.unwrap();

        let orders = repo.list_recent(2).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[0].number > orders[1].number);
    }
}
