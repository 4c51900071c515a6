//! # Order Lifecycle State Machine
//!
//! Governs order status transitions and payment-status transitions.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Received ──► Preparing ──► Ready ──► Completed (terminal)            │
//! │      │             │           │                                        │
//! │      └─────────────┴───────────┴──────► Cancelled (terminal)            │
//! │                                                                         │
//! │   No transition leaves Completed or Cancelled.                          │
//! │                                                                         │
//! │   paymentStatus: Pending ──► Paid   (independent of the board above)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! These functions mutate the in-memory order only. Persisting the change
//! and notifying the customer are the service layer's job - the state
//! machine just exposes the new state for those layers to react to.

use crate::error::{CoreError, CoreResult};
use crate::types::{Order, OrderStatus, PaymentMethod, PaymentStatus, PickupType};

/// The single defined next status for each non-terminal status.
///
/// Returns `None` for terminal statuses.
pub const fn next_status(status: OrderStatus) -> Option<OrderStatus> {
    match status {
        OrderStatus::Received => Some(OrderStatus::Preparing),
        OrderStatus::Preparing => Some(OrderStatus::Ready),
        OrderStatus::Ready => Some(OrderStatus::Completed),
        OrderStatus::Completed | OrderStatus::Cancelled => None,
    }
}

/// Moves the order to its next status on the board.
///
/// Errors with [`CoreError::TerminalStatus`] when the order is already
/// `Completed` or `Cancelled`; kanban callers typically swallow that as a
/// no-op, API callers surface it.
pub fn advance(order: &mut Order) -> CoreResult<OrderStatus> {
    match next_status(order.status) {
        Some(next) => {
            order.status = next;
            Ok(next)
        }
        None => Err(CoreError::TerminalStatus {
            status: order.status,
        }),
    }
}

/// Cancels the order.
///
/// Allowed from `Received`, `Preparing` and `Ready`. A `Completed` order is
/// history and cannot be cancelled anymore; cancelling a `Cancelled` order
/// is also rejected so double-clicks surface instead of silently passing.
pub fn cancel(order: &mut Order) -> CoreResult<()> {
    if order.status.is_terminal() {
        return Err(CoreError::TerminalStatus {
            status: order.status,
        });
    }
    order.status = OrderStatus::Cancelled;
    Ok(())
}

/// Sets the payment status, recording the method when provided.
///
/// Independent of the kanban status: staff can mark an order paid while it
/// is still `Received` (pix before pickup) or right at handover.
pub fn set_payment_status(order: &mut Order, status: PaymentStatus, method: Option<PaymentMethod>) {
    order.payment_status = status;
    if let Some(method) = method {
        order.payment_method = Some(method);
    }
}

/// Overwrites the scheduled pickup time.
///
/// Only valid for scheduled pickups. Slots are advisory, not reserved, so
/// the new time is NOT re-validated against other orders.
pub fn reschedule(order: &mut Order, new_time: impl Into<String>) -> CoreResult<()> {
    if order.pickup_type != PickupType::Scheduled {
        return Err(CoreError::NotScheduled {
            pickup_type: order.pickup_type,
        });
    }
    order.scheduled_time = Some(new_time.into());
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderOrigin, PaymentStatus};
    use chrono::Utc;

    fn order(status: OrderStatus, pickup_type: PickupType) -> Order {
        Order {
            id: "o1".to_string(),
            number: 42,
            origin: OrderOrigin::Online,
            pickup_type,
            scheduled_time: None,
            customer_name: "Ana".to_string(),
            customer_phone: None,
            table_number: None,
            delivery_info: None,
            items: Vec::new(),
            general_observation: String::new(),
            internal_observation: None,
            status,
            payment_method: None,
            payment_status: PaymentStatus::Pending,
            total_cents: 4580,
            created_at: Utc::now(),
            is_printed: false,
        }
    }

    #[test]
    fn test_full_happy_path() {
        let mut o = order(OrderStatus::Received, PickupType::Immediate);

        assert_eq!(advance(&mut o).unwrap(), OrderStatus::Preparing);
        assert_eq!(advance(&mut o).unwrap(), OrderStatus::Ready);
        assert_eq!(advance(&mut o).unwrap(), OrderStatus::Completed);
        assert_eq!(o.status, OrderStatus::Completed);
    }

    #[test]
    fn test_advance_terminal_is_rejected() {
        let mut o = order(OrderStatus::Completed, PickupType::Immediate);
        assert_eq!(
            advance(&mut o),
            Err(CoreError::TerminalStatus {
                status: OrderStatus::Completed
            })
        );
        assert_eq!(o.status, OrderStatus::Completed);

        let mut o = order(OrderStatus::Cancelled, PickupType::Immediate);
        assert!(advance(&mut o).is_err());
        assert_eq!(o.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_cancel_from_every_open_status() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            let mut o = order(status, PickupType::Immediate);
            cancel(&mut o).unwrap();
            assert_eq!(o.status, OrderStatus::Cancelled);
        }
    }

    #[test]
    fn test_cancel_terminal_is_rejected() {
        let mut o = order(OrderStatus::Completed, PickupType::Immediate);
        assert!(cancel(&mut o).is_err());
        assert_eq!(o.status, OrderStatus::Completed);

        let mut o = order(OrderStatus::Cancelled, PickupType::Immediate);
        assert!(cancel(&mut o).is_err());
    }

    #[test]
    fn test_set_payment_status_any_board_state() {
        let mut o = order(OrderStatus::Received, PickupType::Immediate);
        set_payment_status(&mut o, PaymentStatus::Paid, Some(PaymentMethod::Pix));
        assert_eq!(o.payment_status, PaymentStatus::Paid);
        assert_eq!(o.payment_method, Some(PaymentMethod::Pix));

        // method is kept when not provided again
        let mut o = order(OrderStatus::Ready, PickupType::Immediate);
        o.payment_method = Some(PaymentMethod::Cash);
        set_payment_status(&mut o, PaymentStatus::Paid, None);
        assert_eq!(o.payment_method, Some(PaymentMethod::Cash));
    }

    #[test]
    fn test_reschedule_only_for_scheduled_pickup() {
        let mut o = order(OrderStatus::Received, PickupType::Scheduled);
        reschedule(&mut o, "18:45").unwrap();
        assert_eq!(o.scheduled_time.as_deref(), Some("18:45"));

        let mut o = order(OrderStatus::Received, PickupType::Delivery);
        assert_eq!(
            reschedule(&mut o, "18:45"),
            Err(CoreError::NotScheduled {
                pickup_type: PickupType::Delivery
            })
        );
        assert!(o.scheduled_time.is_none());
    }
}
