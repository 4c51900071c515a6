//! # Domain Types
//!
//! Core domain types used throughout Brasa POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │   CashierLog    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price_cents    │   │  number (seq)   │   │  kind open/close│       │
//! │  │  extras[]       │   │  status         │   │  value_cents    │       │
//! │  │  category_id    │   │  total_cents    │   │  summary (close)│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Neighborhood   │   │   OrderStatus   │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  delivery_fee   │   │  Received       │   │  Pix            │       │
//! │  │  allowed_streets│   │  Preparing      │   │  Cash           │       │
//! │  └─────────────────┘   │  Ready          │   │  Credit         │       │
//! │                        │  Completed      │   │  Debit          │       │
//! │                        │  Cancelled      │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! An order has:
//! - `id`: UUID v4 - immutable, used for database relations and tracking links
//! - `number`: sequential business number - what the kitchen shouts out

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Menu: Product / Extra / Category
// =============================================================================

/// A product on the menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to customers and on tickets.
    pub name: String,

    /// Menu description.
    pub description: String,

    /// Price in centavos.
    pub price_cents: i64,

    /// Cost in centavos (for margin reports).
    pub cost_price_cents: Option<i64>,

    /// Whether the product is visible on the storefront (soft delete).
    pub is_active: bool,

    /// Category this product belongs to.
    pub category_id: String,

    /// Optional image URL for the storefront.
    pub image_url: Option<String>,

    /// Optional extras the customer can add (bacon, egg, ...), in menu order.
    pub extras: Vec<ProductExtra>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// An optional add-on for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductExtra {
    pub id: String,
    pub name: String,
    /// Price in centavos, added per unit of the parent line item.
    pub price_cents: i64,
    pub is_active: bool,
}

impl ProductExtra {
    /// Returns the extra's price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A menu category.
///
/// Deletion is forbidden while any product still references the category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Position in the storefront category bar.
    pub sort_order: i64,
}

// =============================================================================
// Delivery: Neighborhood / DeliveryInfo
// =============================================================================

/// A neighborhood the store delivers to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Neighborhood {
    pub id: String,
    pub name: String,

    /// Flat delivery fee in centavos.
    pub delivery_fee_cents: i64,

    /// Estimated distance from the store in km (drives the time estimate).
    pub estimated_distance_km: f64,

    /// Street allow-list. Empty means "no restriction configured".
    #[serde(default)]
    pub allowed_streets: Vec<String>,
}

impl Neighborhood {
    /// Returns the delivery fee as Money.
    #[inline]
    pub fn delivery_fee(&self) -> Money {
        Money::from_cents(self.delivery_fee_cents)
    }
}

/// Delivery address captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryInfo {
    pub neighborhood_id: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub reference: Option<String>,

    /// Fee charged for this order, snapshotted from the neighborhood.
    pub delivery_fee_cents: i64,

    /// Estimated delivery time in minutes, computed at order time.
    pub estimated_minutes: i64,
}

// =============================================================================
// Line Item
// =============================================================================

/// One product selection within an order.
///
/// Uses the snapshot pattern: the full product (and chosen extras) are frozen
/// into the line item at order time, so later menu edits never rewrite the
/// history of completed or cancelled orders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: String,

    /// Product snapshot at order time.
    pub product: Product,

    /// Units ordered (always ≥ 1).
    pub quantity: i64,

    /// Extras chosen by the customer (subset of the product's extras).
    pub selected_extras: Vec<ProductExtra>,

    /// Free-text note ("no onions").
    pub observation: String,
}

/// Delivery address as typed at checkout, before the fee and time estimate
/// are computed and snapshotted into a [`DeliveryInfo`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryAddress {
    pub neighborhood_id: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub reference: Option<String>,
}

// =============================================================================
// Order Enums
// =============================================================================

/// Channel through which an order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderOrigin {
    /// Web storefront.
    Online,
    /// Staff-entered counter sale.
    Counter,
    /// Table self-service (QR at the table).
    Table,
    /// Delivery-platform partner.
    Ifood,
}

/// Fulfillment mode for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PickupType {
    /// Customer picks up as soon as it's ready.
    Immediate,
    /// Customer picks up at a chosen time slot.
    Scheduled,
    /// Home delivery.
    Delivery,
}

/// The kanban status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Just placed, not yet picked up by the kitchen.
    Received,
    /// In the kitchen.
    Preparing,
    /// Waiting for pickup / out for delivery.
    Ready,
    /// Handed to the customer. Terminal.
    Completed,
    /// Cancelled by staff. Terminal; orders are never deleted.
    Cancelled,
}

impl OrderStatus {
    /// Returns true for statuses with no outgoing transitions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Received
    }
}

/// How the customer pays. Self-reported; there is no gateway integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Cash,
    Credit,
    Debit,
}

/// Whether an order has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order.
///
/// Created in `Received`/`Pending` state, advanced through the kanban by
/// staff, and never physically deleted - cancellation is a terminal status,
/// not removal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// Unique identifier (UUID v4), also used in customer tracking links.
    pub id: String,

    /// Sequential business number, unique and strictly increasing per store.
    pub number: i64,

    pub origin: OrderOrigin,
    pub pickup_type: PickupType,

    /// "HH:MM" slot chosen at checkout. Only set for scheduled pickups.
    pub scheduled_time: Option<String>,

    pub customer_name: String,
    pub customer_phone: Option<String>,

    /// Table number for table self-service orders.
    pub table_number: Option<String>,

    /// Address and fee snapshot. Only set for delivery orders.
    pub delivery_info: Option<DeliveryInfo>,

    pub items: Vec<LineItem>,

    /// Customer-visible note (includes "change for R$ X" on cash orders).
    pub general_observation: String,

    /// Staff-only note, never shown to the customer.
    pub internal_observation: Option<String>,

    pub status: OrderStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,

    /// Grand total in centavos: items subtotal + delivery fee.
    pub total_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Whether a kitchen ticket has been printed for this order.
    pub is_printed: bool,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the delivery fee as Money (zero when not a delivery order).
    pub fn delivery_fee(&self) -> Money {
        self.delivery_info
            .as_ref()
            .map(|d| Money::from_cents(d.delivery_fee_cents))
            .unwrap_or_else(Money::zero)
    }
}

/// What a caller submits to place an order.
///
/// Id, sequential number, timestamp, status, totals, and the delivery fee
/// snapshot are all assigned server-side - a draft carries none of them, so
/// a client can never smuggle its own price in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDraft {
    pub origin: OrderOrigin,
    pub pickup_type: PickupType,
    pub scheduled_time: Option<String>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub table_number: Option<String>,
    pub delivery_address: Option<DeliveryAddress>,
    pub items: Vec<LineItem>,
    pub general_observation: String,
    pub internal_observation: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

// =============================================================================
// Cashier Ledger
// =============================================================================

/// Whether a ledger entry opens or closes a cashier session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CashierLogKind {
    Open,
    Close,
}

/// Sales breakdown carried by a `Close` ledger entry.
///
/// Payment-method buckets (pix/cash/credit/debit) ARE a partition of
/// `total_sales_cents`. The channel buckets are NOT: `delivery` is a
/// pickup-type facet that overlaps with both `online` and `counter`
/// (an online delivery order counts toward `delivery` AND `online`).
/// Only `online + counter` adds back up to the total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSummary {
    pub pix_cents: i64,
    pub cash_cents: i64,
    pub credit_cents: i64,
    pub debit_cents: i64,

    /// Orders with pickup type Delivery (overlaps the origin buckets below).
    pub delivery_cents: i64,
    /// Orders with origin Online.
    pub online_cents: i64,
    /// Everything that is not origin Online (counter, table, ifood).
    pub counter_cents: i64,

    pub total_orders: i64,
    pub total_sales_cents: i64,
}

impl SessionSummary {
    /// Returns total sales as Money.
    #[inline]
    pub fn total_sales(&self) -> Money {
        Money::from_cents(self.total_sales_cents)
    }
}

/// An entry in the cashier ledger. Append-only; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashierLog {
    pub id: String,
    pub kind: CashierLogKind,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// Opening float for `Open`; aggregated session total for `Close`.
    pub value_cents: i64,

    /// Who opened/closed the session.
    pub responsible: String,

    /// Optional note ("R$ 50 bill for change").
    pub note: Option<String>,

    /// Session breakdown. Present only on `Close` entries.
    pub summary: Option<SessionSummary>,
}

// =============================================================================
// Store Settings
// =============================================================================

/// One entry of the weekly opening-hours table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OpeningHours {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// "HH:MM".
    pub open_time: String,
    /// "HH:MM".
    pub close_time: String,
}

/// Store-wide configuration. Singleton, mutated by admin actions.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreSettings {
    pub name: String,
    pub is_open: bool,
    pub is_cashier_open: bool,

    /// Default preparation time in minutes (pickup estimate).
    pub prep_time_minutes: i64,

    pub neighborhoods: Vec<Neighborhood>,

    /// Maximum delivery radius in km.
    pub delivery_radius_km: f64,

    pub opening_hours: Vec<OpeningHours>,

    /// Store WhatsApp number for order confirmation deep links.
    pub whatsapp_number: Option<String>,

    /// Interval between offered pickup slots, in minutes.
    pub scheduling_interval_minutes: i64,

    /// Shared PIN gating the admin panel.
    pub admin_pin: Option<String>,

    /// When false, any street is accepted for delivery.
    pub street_validation_enabled: bool,

    /// Play a sound on new orders in the staff panel.
    pub sound_enabled: bool,
}

/// Defaults used while settings load, and as the recovery fallback when the
/// persisted row is missing or malformed.
impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Brasa Lanches".to_string(),
            is_open: true,
            is_cashier_open: false,
            prep_time_minutes: 30,
            neighborhoods: Vec::new(),
            delivery_radius_km: 10.0,
            opening_hours: Vec::new(),
            whatsapp_number: None,
            scheduling_interval_minutes: 15,
            admin_pin: None,
            street_validation_enabled: false,
            sound_enabled: true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminal() {
        assert!(!OrderStatus::Received.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Received).unwrap(),
            "\"received\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Pix).unwrap(),
            "\"pix\""
        );
        assert_eq!(
            serde_json::to_string(&PickupType::Delivery).unwrap(),
            "\"delivery\""
        );
        assert_eq!(
            serde_json::to_string(&OrderOrigin::Ifood).unwrap(),
            "\"ifood\""
        );
    }

    #[test]
    fn test_settings_defaults() {
        let s = StoreSettings::default();
        assert!(s.is_open);
        assert!(!s.is_cashier_open);
        assert_eq!(s.prep_time_minutes, 30);
        assert_eq!(s.scheduling_interval_minutes, 15);
        assert!((s.delivery_radius_km - 10.0).abs() < f64::EPSILON);
        assert!(s.neighborhoods.is_empty());
    }

    #[test]
    fn test_order_delivery_fee_accessor() {
        let info = DeliveryInfo {
            neighborhood_id: "n1".to_string(),
            street: "Rua A".to_string(),
            number: "100".to_string(),
            complement: None,
            reference: None,
            delivery_fee_cents: 500,
            estimated_minutes: 30,
        };

        let mut order = sample_order();
        assert_eq!(order.delivery_fee(), Money::zero());

        order.delivery_info = Some(info);
        assert_eq!(order.delivery_fee().cents(), 500);
    }

    fn sample_order() -> Order {
        Order {
            id: "o1".to_string(),
            number: 1,
            origin: OrderOrigin::Online,
            pickup_type: PickupType::Immediate,
            scheduled_time: None,
            customer_name: "Ana".to_string(),
            customer_phone: None,
            table_number: None,
            delivery_info: None,
            items: Vec::new(),
            general_observation: String::new(),
            internal_observation: None,
            status: OrderStatus::Received,
            payment_method: None,
            payment_status: PaymentStatus::Pending,
            total_cents: 0,
            created_at: chrono::Utc::now(),
            is_printed: false,
        }
    }
}
