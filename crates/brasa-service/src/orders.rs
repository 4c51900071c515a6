//! # Order Service
//!
//! Checkout orchestration and the order lifecycle workflows.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(draft)                                                     │
//! │       │                                                                 │
//! │       ├── 1. load settings, gate online checkout on is_open            │
//! │       ├── 2. validate the draft (brasa-core::validation)               │
//! │       ├── 3. resolve items against the LIVE menu                       │
//! │       │      client snapshots are discarded; prices come from the      │
//! │       │      products table, so a client can never smuggle a price     │
//! │       ├── 4. snapshot delivery fee + time estimate                     │
//! │       ├── 5. total = subtotal + fee (brasa-core::pricing)              │
//! │       └── 6. persist; the sequential number is assigned in the         │
//! │              insert transaction and the canonical order comes back     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use brasa_core::{
    lifecycle, pricing, validation, DeliveryInfo, LineItem, Order, OrderDraft, OrderOrigin,
    OrderStatus, PaymentMethod, PaymentStatus, PickupType,
};
use brasa_db::{Database, OrderEvent};

use crate::error::{ServiceError, ServiceResult};

/// Orchestrates checkout and order lifecycle operations.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    /// Places an order from a draft, returning the canonical persisted order.
    ///
    /// The returned order carries the assigned sequential number and the
    /// server-computed total; callers display those, never their own.
    pub async fn place_order(&self, draft: OrderDraft) -> ServiceResult<Order> {
        let settings = self.db.settings().get().await?;

        // Staff can always ring up counter orders; only the storefront is
        // gated on the open/closed toggle.
        if !settings.is_open && draft.origin == OrderOrigin::Online {
            return Err(ServiceError::StoreClosed);
        }

        validation::validate_order_draft(&draft, &settings)?;

        let items = self.resolve_items(&draft.items).await?;

        let neighborhood = match (draft.pickup_type, &draft.delivery_address) {
            (PickupType::Delivery, Some(addr)) => settings
                .neighborhoods
                .iter()
                .find(|n| n.id == addr.neighborhood_id)
                .cloned(),
            _ => None,
        };

        let delivery_info = match (&draft.delivery_address, &neighborhood) {
            (Some(addr), Some(n)) => Some(DeliveryInfo {
                neighborhood_id: n.id.clone(),
                street: addr.street.clone(),
                number: addr.number.clone(),
                complement: addr.complement.clone(),
                reference: addr.reference.clone(),
                delivery_fee_cents: n.delivery_fee_cents,
                estimated_minutes: pricing::estimated_minutes(
                    draft.pickup_type,
                    Some(n),
                    settings.prep_time_minutes,
                ),
            }),
            _ => None,
        };

        let total = pricing::grand_total(&items, draft.pickup_type, neighborhood.as_ref());

        let order = Order {
            id: Uuid::new_v4().to_string(),
            number: 0, // assigned by the repository
            origin: draft.origin,
            pickup_type: draft.pickup_type,
            scheduled_time: draft.scheduled_time,
            customer_name: draft.customer_name.trim().to_string(),
            customer_phone: draft.customer_phone,
            table_number: draft.table_number,
            delivery_info,
            items,
            general_observation: draft.general_observation,
            internal_observation: draft.internal_observation,
            status: OrderStatus::Received,
            payment_method: draft.payment_method,
            payment_status: PaymentStatus::Pending,
            total_cents: total.cents(),
            created_at: Utc::now(),
            is_printed: false,
        };

        let order = self.db.orders().create(order).await?;

        info!(
            number = order.number,
            total = %order.total(),
            origin = ?order.origin,
            "Order placed"
        );

        Ok(order)
    }

    /// Rebuilds draft line items from the live menu.
    ///
    /// Product and extra prices in the draft are ignored. Each item is
    /// re-snapshotted from the products table; selected extras must exist
    /// (and be active) on the product they claim to belong to.
    async fn resolve_items(&self, draft_items: &[LineItem]) -> ServiceResult<Vec<LineItem>> {
        let products = self.db.products();
        let mut items = Vec::with_capacity(draft_items.len());

        for draft_item in draft_items {
            let product = products
                .get_by_id(&draft_item.product.id)
                .await?
                .filter(|p| p.is_active)
                .ok_or_else(|| ServiceError::ProductUnavailable {
                    id: draft_item.product.id.clone(),
                })?;

            let mut selected_extras = Vec::with_capacity(draft_item.selected_extras.len());
            for chosen in &draft_item.selected_extras {
                let extra = product
                    .extras
                    .iter()
                    .find(|e| e.id == chosen.id && e.is_active)
                    .ok_or_else(|| ServiceError::not_found("Product extra", &chosen.id))?;
                selected_extras.push(extra.clone());
            }

            items.push(LineItem {
                id: Uuid::new_v4().to_string(),
                product,
                quantity: draft_item.quantity,
                selected_extras,
                observation: draft_item.observation.clone(),
            });
        }

        Ok(items)
    }

    /// Moves an order to its next status on the board.
    pub async fn advance(&self, id: &str) -> ServiceResult<Order> {
        let mut order = self.get(id).await?;
        let next = lifecycle::advance(&mut order)?;
        self.db.orders().update_status(id, next).await?;

        debug!(id = %id, status = ?next, "Order advanced");
        Ok(order)
    }

    /// Cancels an order. Rejected once the order is in a terminal status.
    pub async fn cancel(&self, id: &str) -> ServiceResult<Order> {
        let mut order = self.get(id).await?;
        lifecycle::cancel(&mut order)?;
        self.db
            .orders()
            .update_status(id, OrderStatus::Cancelled)
            .await?;

        info!(number = order.number, "Order cancelled");
        Ok(order)
    }

    /// Marks an order paid, recording the method when provided.
    pub async fn mark_paid(
        &self,
        id: &str,
        method: Option<PaymentMethod>,
    ) -> ServiceResult<Order> {
        let mut order = self.get(id).await?;
        lifecycle::set_payment_status(&mut order, PaymentStatus::Paid, method);
        self.db
            .orders()
            .update_payment(id, PaymentStatus::Paid, method)
            .await?;
        Ok(order)
    }

    /// Changes the pickup slot of a scheduled order.
    pub async fn reschedule(&self, id: &str, new_time: &str) -> ServiceResult<Order> {
        validation::validate_slot_format(new_time)?;

        let mut order = self.get(id).await?;
        lifecycle::reschedule(&mut order, new_time)?;
        self.db.orders().update_scheduled_time(id, new_time).await?;
        Ok(order)
    }

    /// Marks an order's kitchen ticket as printed.
    pub async fn mark_printed(&self, id: &str) -> ServiceResult<()> {
        self.db.orders().mark_printed(id).await?;
        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get(&self, id: &str) -> ServiceResult<Order> {
        self.db
            .orders()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", id))
    }

    /// Lists the most recent orders, newest first.
    pub async fn list_recent(&self, limit: i64) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_recent(limit).await?)
    }

    /// Lists open (non-terminal) orders for the kanban, oldest first.
    pub async fn list_open(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_open().await?)
    }

    /// Subscribes to order change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.db.subscribe_orders()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
