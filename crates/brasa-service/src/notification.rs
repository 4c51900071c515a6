//! # Order Notifications
//!
//! Renders the customer-facing order confirmation: a plain-text message and
//! a WhatsApp deep link when the store has a number configured.
//!
//! Pure rendering; nothing here sends anything. The storefront opens the
//! link, the staff panel copies the text.

use serde::{Deserialize, Serialize};

use brasa_core::{Order, PickupType, StoreSettings};

/// Rendered confirmation for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMessage {
    /// Plain-text message body.
    pub text: String,

    /// `https://wa.me/...` deep link with the body pre-filled.
    /// None when the store has no WhatsApp number configured.
    pub link: Option<String>,
}

/// Builds the confirmation message for an order.
pub fn order_confirmation(settings: &StoreSettings, order: &Order) -> OrderMessage {
    let mut text = format!(
        "*{}*\nPedido #{} confirmado!\nCliente: {}\n\n",
        settings.name, order.number, order.customer_name
    );

    for item in &order.items {
        text.push_str(&format!("{}x {}", item.quantity, item.product.name));
        if !item.selected_extras.is_empty() {
            let extras: Vec<&str> = item
                .selected_extras
                .iter()
                .map(|e| e.name.as_str())
                .collect();
            text.push_str(&format!(" (+ {})", extras.join(", ")));
        }
        text.push('\n');
    }

    match (order.pickup_type, &order.delivery_info) {
        (PickupType::Delivery, Some(info)) => {
            text.push_str(&format!(
                "\nEntrega: {}, {} — aprox. {} min\n",
                info.street, info.number, info.estimated_minutes
            ));
        }
        (PickupType::Scheduled, _) => {
            if let Some(time) = &order.scheduled_time {
                text.push_str(&format!("\nRetirada agendada: {time}\n"));
            }
        }
        _ => {}
    }

    text.push_str(&format!("\nTotal: {}", order.total()));

    let link = settings
        .whatsapp_number
        .as_ref()
        .map(|number| format!("https://wa.me/{}?text={}", number, percent_encode(&text)));

    OrderMessage { text, link }
}

/// Percent-encodes a message body for a wa.me query parameter.
///
/// Unreserved characters (RFC 3986) pass through; everything else is
/// encoded byte-wise.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use brasa_core::{
        DeliveryInfo, LineItem, OrderOrigin, OrderStatus, PaymentStatus, Product, ProductExtra,
    };
    use chrono::Utc;

    fn order() -> Order {
        Order {
            id: "o1".to_string(),
            number: 42,
            origin: OrderOrigin::Online,
            pickup_type: PickupType::Immediate,
            scheduled_time: None,
            customer_name: "Ana".to_string(),
            customer_phone: None,
            table_number: None,
            delivery_info: None,
            items: vec![LineItem {
                id: "i1".to_string(),
                product: Product {
                    id: "p1".to_string(),
                    name: "X-Burger".to_string(),
                    description: String::new(),
                    price_cents: 1890,
                    cost_price_cents: None,
                    is_active: true,
                    category_id: "c1".to_string(),
                    image_url: None,
                    extras: Vec::new(),
                },
                quantity: 2,
                selected_extras: vec![ProductExtra {
                    id: "e1".to_string(),
                    name: "Bacon".to_string(),
                    price_cents: 400,
                    is_active: true,
                }],
                observation: String::new(),
            }],
            general_observation: String::new(),
            internal_observation: None,
            status: OrderStatus::Received,
            payment_method: None,
            payment_status: PaymentStatus::Pending,
            total_cents: 4580,
            created_at: Utc::now(),
            is_printed: false,
        }
    }

    #[test]
    fn test_message_body_contents() {
        let msg = order_confirmation(&StoreSettings::default(), &order());

        assert!(msg.text.contains("Pedido #42"));
        assert!(msg.text.contains("2x X-Burger (+ Bacon)"));
        assert!(msg.text.contains("Total: R$ 45,80"));
        assert!(msg.link.is_none());
    }

    #[test]
    fn test_delivery_line_and_link() {
        let mut settings = StoreSettings::default();
        settings.whatsapp_number = Some("5511999990000".to_string());

        let mut o = order();
        o.pickup_type = PickupType::Delivery;
        o.delivery_info = Some(DeliveryInfo {
            neighborhood_id: "n1".to_string(),
            street: "Rua General Osório".to_string(),
            number: "100".to_string(),
            complement: None,
            reference: None,
            delivery_fee_cents: 500,
            estimated_minutes: 31,
        });

        let msg = order_confirmation(&settings, &o);
        assert!(msg.text.contains("Entrega: Rua General Osório, 100"));

        let link = msg.link.unwrap();
        assert!(link.starts_with("https://wa.me/5511999990000?text="));
        // no raw spaces or newlines survive encoding
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }

    #[test]
    fn test_scheduled_line() {
        let mut o = order();
        o.pickup_type = PickupType::Scheduled;
        o.scheduled_time = Some("18:45".to_string());

        let msg = order_confirmation(&StoreSettings::default(), &o);
        assert!(msg.text.contains("Retirada agendada: 18:45"));
    }

    #[test]
    fn test_percent_encode_roundtrip_chars() {
        assert_eq!(percent_encode("abc-_.~"), "abc-_.~");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("#"), "%23");
    }
}
