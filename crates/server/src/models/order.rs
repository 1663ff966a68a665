//! Order records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aster_core::{money, OrderId, OrderStatus, PaymentMethod};

/// Reference to the product a line item was created from.
///
/// The catalog has carried both numeric and opaque string identifiers over
/// time, so both are accepted and preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineItemRef {
    Number(i64),
    Text(String),
}

impl Default for LineItemRef {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl std::fmt::Display for LineItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One line of a cart at the moment of checkout.
///
/// Name, price and image are snapshots; later catalog edits do not touch
/// existing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    #[serde(default)]
    pub id: LineItemRef,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "money::lenient")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

impl OrderLineItem {
    /// Price times quantity, for display purposes.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A customer's confirmed purchase request.
///
/// Created once at checkout with `status = pending`; afterwards only
/// `status`, `tracking_number` and `updated_at` change, through the
/// back-office endpoints. Totals are whatever the client computed - the
/// ingestion path coerces them to non-negative decimals but does not
/// re-derive or cross-check them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house_number: String,
    #[serde(default)]
    pub address_extra: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    pub items: Vec<OrderLineItem>,
    #[serde(default, deserialize_with = "money::lenient")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub shipping_fee: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub total: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_line_item_defaults() {
        let item: OrderLineItem = serde_json::from_value(json!({"name": "Scarf"})).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, Decimal::ZERO);
        assert_eq!(item.id, LineItemRef::Number(0));
        assert!(item.selected_size.is_none());
    }

    #[test]
    fn test_line_item_ref_accepts_number_and_string() {
        let a: OrderLineItem =
            serde_json::from_value(json!({"id": 7, "name": "Scarf"})).unwrap();
        assert_eq!(a.id, LineItemRef::Number(7));

        let b: OrderLineItem =
            serde_json::from_value(json!({"id": "f4b0a2c1", "name": "Scarf"})).unwrap();
        assert_eq!(b.id, LineItemRef::Text("f4b0a2c1".to_string()));
    }

    #[test]
    fn test_line_total() {
        let item = OrderLineItem {
            id: LineItemRef::Number(1),
            name: "Scarf".to_string(),
            price: Decimal::new(1000, 2),
            quantity: 3,
            image: String::new(),
            selected_size: None,
            selected_color: None,
        };
        assert_eq!(item.line_total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_order_wire_names_are_camel_case() {
        let order: Order = serde_json::from_value(json!({
            "id": "ORD-1",
            "customerName": "A",
            "email": "a@x.com",
            "houseNumber": "12b",
            "items": [{"id": 1, "name": "Scarf", "price": 15, "quantity": 1}],
            "subtotal": 15,
            "shippingFee": 6,
            "total": 21,
            "paymentMethod": "bankTransfer",
            "status": "pending",
            "orderDate": "2025-10-02T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(order.house_number, "12b");
        assert_eq!(order.shipping_fee, Decimal::new(6, 0));

        let value = serde_json::to_value(&order).unwrap();
        assert!(value.get("customerName").is_some());
        assert!(value.get("orderDate").is_some());
        // absent tracking number stays off the wire; userId is always present
        assert!(value.get("trackingNumber").is_none());
        assert!(value.get("userId").is_some());
    }
}
