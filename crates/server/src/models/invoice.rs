//! Invoice records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aster_core::{money, InvoiceId, OrderId};

use super::order::{Order, OrderLineItem};

/// An immutable financial record derived 1:1 from an order at creation.
///
/// Everything except the identifiers is a duplicated snapshot of the order
/// at the moment it was created; there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub order_id: OrderId,
    pub customer_name: String,
    pub email: String,
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
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Invoice {
    /// Derive the invoice for a freshly created order.
    #[must_use]
    pub fn derive(order: &Order, id: InvoiceId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            order_id: order.id.clone(),
            customer_name: order.customer_name.clone(),
            email: order.email.clone(),
            street: order.street.clone(),
            house_number: order.house_number.clone(),
            address_extra: order.address_extra.clone(),
            postal_code: order.postal_code.clone(),
            city: order.city.clone(),
            items: order.items.clone(),
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            total: order.total,
            created_at,
            user_id: order.user_id.clone(),
        }
    }
}
