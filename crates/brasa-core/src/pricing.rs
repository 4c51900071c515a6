//! # Pricing Engine
//!
//! Computes line-item totals, order subtotals, delivery fees and grand
//! totals. Every function here is pure: same input, same output, no I/O.
//!
//! ## Price Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  X-Burger R$ 18,90 + Bacon R$ 4,00, quantity 2                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  line_item_total ──► (1890 + 400) × 2 = 4580                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  order_subtotal ──► Σ line totals                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  grand_total ──► subtotal + delivery_fee (0 unless delivery)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is integer centavos via [`Money`]; there is no floating
//! point anywhere in the money path.

use crate::money::Money;
use crate::types::{LineItem, Neighborhood, PickupType};

/// Base minutes added to every delivery estimate (kitchen + dispatch).
const DELIVERY_BASE_MINUTES: i64 = 20;

/// Extra minutes per estimated km of distance.
const DELIVERY_MINUTES_PER_KM: f64 = 5.0;

/// Total for one line item: `(product price + Σ selected extras) × quantity`.
///
/// A quantity below 1 is invalid input and is clamped to 1 here; the
/// validation layer rejects such drafts before they reach pricing, this is
/// the last line of defense.
///
/// ## Example
/// ```rust
/// use brasa_core::pricing::line_item_total;
/// # use brasa_core::types::{LineItem, Product, ProductExtra};
/// # let product = Product {
/// #     id: "p1".into(), name: "X-Burger".into(), description: String::new(),
/// #     price_cents: 1890, cost_price_cents: None, is_active: true,
/// #     category_id: "c1".into(), image_url: None, extras: vec![],
/// # };
/// # let bacon = ProductExtra { id: "e1".into(), name: "Bacon".into(), price_cents: 400, is_active: true };
/// let item = LineItem {
///     id: "i1".into(),
///     product,
///     quantity: 2,
///     selected_extras: vec![bacon],
///     observation: String::new(),
/// };
/// assert_eq!(line_item_total(&item).cents(), 4580); // R$ 45,80
/// ```
pub fn line_item_total(item: &LineItem) -> Money {
    let extras: Money = item.selected_extras.iter().map(|e| e.price()).sum();
    let unit = item.product.price() + extras;
    unit.multiply_quantity(item.quantity.max(1))
}

/// Sum of all line-item totals.
pub fn order_subtotal(items: &[LineItem]) -> Money {
    items.iter().map(line_item_total).sum()
}

/// Delivery fee for the order.
///
/// Non-zero only when the pickup type is `Delivery` AND a neighborhood has
/// been selected; every other combination is free.
pub fn delivery_fee(pickup_type: PickupType, neighborhood: Option<&Neighborhood>) -> Money {
    match (pickup_type, neighborhood) {
        (PickupType::Delivery, Some(n)) => n.delivery_fee(),
        _ => Money::zero(),
    }
}

/// Grand total: `order_subtotal + delivery_fee`.
pub fn grand_total(
    items: &[LineItem],
    pickup_type: PickupType,
    neighborhood: Option<&Neighborhood>,
) -> Money {
    order_subtotal(items) + delivery_fee(pickup_type, neighborhood)
}

/// Estimated fulfillment time in minutes.
///
/// Delivery orders: 20 minutes base + 5 per estimated km, rounded up.
/// Everything else: the store's configured prep time.
pub fn estimated_minutes(
    pickup_type: PickupType,
    neighborhood: Option<&Neighborhood>,
    prep_time_minutes: i64,
) -> i64 {
    match (pickup_type, neighborhood) {
        (PickupType::Delivery, Some(n)) => {
            DELIVERY_BASE_MINUTES
                + (n.estimated_distance_km * DELIVERY_MINUTES_PER_KM).ceil() as i64
        }
        _ => prep_time_minutes,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductExtra};

    fn product(price_cents: i64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "X-Burger".to_string(),
            description: "Pão, hambúrguer, queijo".to_string(),
            price_cents,
            cost_price_cents: Some(850),
            is_active: true,
            category_id: "c1".to_string(),
            image_url: None,
            extras: Vec::new(),
        }
    }

    fn extra(price_cents: i64) -> ProductExtra {
        ProductExtra {
            id: "e1".to_string(),
            name: "Bacon".to_string(),
            price_cents,
            is_active: true,
        }
    }

    fn item(price_cents: i64, extras: Vec<ProductExtra>, quantity: i64) -> LineItem {
        LineItem {
            id: "i1".to_string(),
            product: product(price_cents),
            quantity,
            selected_extras: extras,
            observation: String::new(),
        }
    }

    fn neighborhood(fee_cents: i64, km: f64) -> Neighborhood {
        Neighborhood {
            id: "n1".to_string(),
            name: "Centro".to_string(),
            delivery_fee_cents: fee_cents,
            estimated_distance_km: km,
            allowed_streets: Vec::new(),
        }
    }

    #[test]
    fn test_line_item_total_with_extra() {
        // R$ 18,90 + R$ 4,00 bacon, quantity 2 = R$ 45,80
        let li = item(1890, vec![extra(400)], 2);
        assert_eq!(line_item_total(&li).cents(), 4580);
    }

    #[test]
    fn test_line_item_total_no_extras() {
        let li = item(1200, vec![], 3);
        assert_eq!(line_item_total(&li).cents(), 3600);
    }

    #[test]
    fn test_invalid_quantity_clamped() {
        let li = item(1000, vec![], 0);
        assert_eq!(line_item_total(&li).cents(), 1000);

        let li = item(1000, vec![], -5);
        assert_eq!(line_item_total(&li).cents(), 1000);
    }

    #[test]
    fn test_changing_extras_changes_subtotal_by_exact_amount() {
        let without = item(1890, vec![], 2);
        let with = item(1890, vec![extra(400)], 2);

        let delta = line_item_total(&with) - line_item_total(&without);
        // added extra price × quantity
        assert_eq!(delta.cents(), 400 * 2);
    }

    #[test]
    fn test_order_subtotal_sums_lines() {
        let items = vec![item(1890, vec![extra(400)], 2), item(1200, vec![], 1)];
        assert_eq!(order_subtotal(&items).cents(), 4580 + 1200);
    }

    #[test]
    fn test_delivery_fee_only_for_delivery() {
        let n = neighborhood(500, 2.0);

        assert_eq!(
            delivery_fee(PickupType::Delivery, Some(&n)).cents(),
            500
        );
        assert!(delivery_fee(PickupType::Immediate, Some(&n)).is_zero());
        assert!(delivery_fee(PickupType::Scheduled, Some(&n)).is_zero());
        assert!(delivery_fee(PickupType::Delivery, None).is_zero());
    }

    #[test]
    fn test_grand_total_scenario() {
        // one product 18,90 + extra 4,00, qty 2, no delivery
        let items = vec![item(1890, vec![extra(400)], 2)];
        assert_eq!(
            grand_total(&items, PickupType::Immediate, None).cents(),
            4580
        );

        // add delivery with fee 5,00
        let n = neighborhood(500, 2.0);
        assert_eq!(
            grand_total(&items, PickupType::Delivery, Some(&n)).cents(),
            5080
        );
    }

    #[test]
    fn test_estimated_minutes() {
        let n = neighborhood(500, 2.2);
        // 20 + ceil(2.2 × 5) = 20 + 11 = 31
        assert_eq!(estimated_minutes(PickupType::Delivery, Some(&n), 30), 31);
        // non-delivery falls back to prep time
        assert_eq!(estimated_minutes(PickupType::Immediate, Some(&n), 30), 30);
        assert_eq!(estimated_minutes(PickupType::Delivery, None, 45), 45);
    }
}
