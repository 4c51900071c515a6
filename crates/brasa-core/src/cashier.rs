//! # Cashier Session Accounting
//!
//! Aggregates completed orders since the last session-open ledger entry into
//! a payment/channel breakdown, and builds the open/close ledger entries.
//!
//! ## Session Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ledger (append-only, newest first):                                    │
//! │                                                                         │
//! │    close ◄── summary frozen here                                        │
//! │    open  ◄───────────────┐                                              │
//! │    close                 │  "current session" = completed orders        │
//! │    open                  │  created after this timestamp                │
//! │                          │                                              │
//! │  No open entry at all → every completed order is in the session.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bucket Semantics (IMPORTANT for report readers)
//! Payment methods (pix/cash/credit/debit) partition total sales. The
//! channel buckets do NOT: `delivery` is a pickup-type facet that overlaps
//! `online` and `counter` (origin facets). `online + counter` adds back up
//! to the total; never assert that all three do.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{
    CashierLog, CashierLogKind, Order, OrderOrigin, OrderStatus, PaymentMethod, PickupType,
    SessionSummary,
};

/// Filters the orders belonging to the current cashier session.
///
/// An order is in the session when its status is `Completed` and it was
/// created after the most recent `Open` ledger entry. With no `Open` entry
/// on record, all completed orders qualify.
pub fn session_orders<'a>(orders: &'a [Order], last_open: Option<&CashierLog>) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .filter(|o| match last_open {
            Some(open) => o.created_at > open.timestamp,
            None => true,
        })
        .collect()
}

/// Aggregates a set of orders into a [`SessionSummary`].
///
/// Orders without a payment method contribute to the total and the channel
/// buckets but to no method bucket.
pub fn summarize<'a, I>(orders: I) -> SessionSummary
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut summary = SessionSummary::default();

    for order in orders {
        summary.total_orders += 1;
        summary.total_sales_cents += order.total_cents;

        match order.payment_method {
            Some(PaymentMethod::Pix) => summary.pix_cents += order.total_cents,
            Some(PaymentMethod::Cash) => summary.cash_cents += order.total_cents,
            Some(PaymentMethod::Credit) => summary.credit_cents += order.total_cents,
            Some(PaymentMethod::Debit) => summary.debit_cents += order.total_cents,
            None => {}
        }

        // Facets, not a partition: delivery overlaps the origin buckets.
        if order.pickup_type == PickupType::Delivery {
            summary.delivery_cents += order.total_cents;
        }
        if order.origin == OrderOrigin::Online {
            summary.online_cents += order.total_cents;
        } else {
            summary.counter_cents += order.total_cents;
        }
    }

    summary
}

/// Builds an `Open` ledger entry with the given opening float.
pub fn open_log(
    value_cents: i64,
    responsible: impl Into<String>,
    note: Option<String>,
    at: DateTime<Utc>,
) -> CashierLog {
    CashierLog {
        id: Uuid::new_v4().to_string(),
        kind: CashierLogKind::Open,
        timestamp: at,
        value_cents,
        responsible: responsible.into(),
        note,
        summary: None,
    }
}

/// Builds a `Close` ledger entry freezing the session summary.
///
/// The entry's value is the session's total sales; the full breakdown rides
/// along as its permanent summary.
pub fn close_log(
    summary: SessionSummary,
    responsible: impl Into<String>,
    at: DateTime<Utc>,
) -> CashierLog {
    CashierLog {
        id: Uuid::new_v4().to_string(),
        kind: CashierLogKind::Close,
        timestamp: at,
        value_cents: summary.total_sales_cents,
        responsible: responsible.into(),
        note: None,
        summary: Some(summary),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
