//! Order ingestion.
//!
//! The one multi-step write path in the system: accept a checkout
//! submission, durably record the order, derive and record its invoice,
//! then hand the order to the notification dispatcher. The two writes are
//! strictly ordered within one call; across concurrent calls there is no
//! coordination - identifiers are generated, so there is nothing to
//! contend over.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use aster_core::{money, InvoiceId, OrderId, PaymentMethod};

use crate::error::{ApiError, Result};
use crate::kv::{keys, KvStore};
use crate::models::{Invoice, Order, OrderLineItem};
use crate::services::notifier::Notifier;

/// Checkout submission payload.
///
/// Identity (`customerName`, `email`) and a non-empty `items` list are the
/// only hard requirements. Amounts coerce leniently: missing or malformed
/// numbers become zero and are otherwise trusted as the client computed
/// them - the handler does not re-derive `total` from `items`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
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
    #[serde(default)]
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
    pub user_id: Option<String>,
}

/// Result of a successful ingestion: the persisted pair.
#[derive(Debug, Serialize)]
pub struct CreatedOrder {
    pub order: Order,
    pub invoice: Invoice,
}

/// Order ingestion over the key-value store.
pub struct OrderIngest<'a> {
    store: &'a KvStore,
    notifier: &'a Notifier,
}

impl<'a> OrderIngest<'a> {
    /// Create the ingestion service for one request.
    #[must_use]
    pub const fn new(store: &'a KvStore, notifier: &'a Notifier) -> Self {
        Self { store, notifier }
    }

    /// Validate and persist an order with its derived invoice.
    ///
    /// The order write completes (or aborts the call) before the invoice
    /// write begins; the invoice write completes before the notification
    /// is enqueued. Validation failures perform zero writes.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` when identity fields or items are missing;
    /// `ApiError::Store` when a primary write fails.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: CreateOrderRequest) -> Result<CreatedOrder> {
        if payload.customer_name.trim().is_empty()
            || payload.email.trim().is_empty()
            || payload.items.is_empty()
        {
            return Err(ApiError::Validation("Missing required fields".to_string()));
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(generate_entity_id("ORD", now)),
            customer_name: payload.customer_name,
            email: payload.email,
            phone: payload.phone,
            street: payload.street,
            house_number: payload.house_number,
            address_extra: payload.address_extra,
            postal_code: payload.postal_code,
            city: payload.city,
            items: payload.items,
            subtotal: payload.subtotal,
            shipping_fee: payload.shipping_fee,
            total: payload.total,
            payment_method: payload.payment_method,
            status: aster_core::OrderStatus::Pending,
            tracking_number: None,
            order_date: now,
            updated_at: None,
            user_id: payload.user_id,
        };

        self.store
            .set(&keys::order(&order.id), serde_json::to_value(&order)?)
            .await?;
        info!(order_id = %order.id, "Order saved");

        let invoice_created_at = Utc::now();
        let invoice = Invoice::derive(
            &order,
            InvoiceId::new(generate_entity_id("INV", invoice_created_at)),
            invoice_created_at,
        );
        self.store
            .set(&keys::invoice(&invoice.id), serde_json::to_value(&invoice)?)
            .await?;
        info!(invoice_id = %invoice.id, order_id = %order.id, "Invoice created");

        // Non-critical side effect: outcome is the dispatcher's problem.
        self.notifier.notify_order_created(order.clone());

        Ok(CreatedOrder { order, invoice })
    }
}

/// Generate a `<PREFIX>-<millis>-<random8hex>` identifier.
fn generate_entity_id(prefix: &str, now: DateTime<Utc>) -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    format!("{prefix}-{}-{suffix}", now.timestamp_millis())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use aster_core::OrderStatus;

    use super::*;

    fn valid_payload() -> CreateOrderRequest {
        serde_json::from_value(json!({
            "customerName": "A",
            "email": "a@x.com",
            "items": [{"id": 1, "name": "Scarf", "price": 15, "quantity": 1}],
            "subtotal": 15,
            "shippingFee": 6,
            "total": 21,
            "paymentMethod": "bankTransfer"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_creates_exactly_one_order_and_one_invoice() {
        let store = KvStore::memory();
        let notifier = Notifier::disabled();

        let created = OrderIngest::new(&store, &notifier)
            .create(valid_payload())
            .await
            .unwrap();

        assert_eq!(created.invoice.order_id, created.order.id);
        assert_eq!(created.order.status, OrderStatus::Pending);

        let orders = store.scan_by_prefix(keys::ORDER).await.unwrap();
        let invoices = store.scan_by_prefix(keys::INVOICE).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(invoices.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_performs_zero_writes() {
        let store = KvStore::memory();
        let notifier = Notifier::disabled();
        let ingest = OrderIngest::new(&store, &notifier);

        for broken in [
            json!({"email": "a@x.com", "items": [{"name": "Scarf"}]}),
            json!({"customerName": "A", "items": [{"name": "Scarf"}]}),
            json!({"customerName": "A", "email": "a@x.com", "items": []}),
            json!({"customerName": "A", "email": "a@x.com"}),
            json!({"customerName": "  ", "email": "a@x.com", "items": [{"name": "S"}]}),
        ] {
            let payload: CreateOrderRequest = serde_json::from_value(broken).unwrap();
            let err = ingest.create(payload).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }

        assert!(store.scan_by_prefix(keys::ORDER).await.unwrap().is_empty());
        assert!(store.scan_by_prefix(keys::INVOICE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_totals_are_trusted_not_recomputed() {
        // items say 10.00 x2 + 6.00 shipping, but the client claims 99.
        // Current contract: the handler stores the claim verbatim.
        let store = KvStore::memory();
        let notifier = Notifier::disabled();

        let payload: CreateOrderRequest = serde_json::from_value(json!({
            "customerName": "A",
            "email": "a@x.com",
            "items": [{"id": 1, "name": "Scarf", "price": 10.00, "quantity": 2}],
            "subtotal": 20.00,
            "shippingFee": 6.00,
            "total": 99
        }))
        .unwrap();

        let created = OrderIngest::new(&store, &notifier)
            .create(payload)
            .await
            .unwrap();

        assert_eq!(created.order.total, Decimal::new(99, 0));
        assert_eq!(created.order.subtotal + created.order.shipping_fee, Decimal::new(26, 0));
    }

    #[tokio::test]
    async fn test_missing_amounts_coerce_to_zero() {
        let store = KvStore::memory();
        let notifier = Notifier::disabled();

        let payload: CreateOrderRequest = serde_json::from_value(json!({
            "customerName": "A",
            "email": "a@x.com",
            "items": [{"name": "Scarf"}],
            "total": "garbage"
        }))
        .unwrap();

        let created = OrderIngest::new(&store, &notifier)
            .create(payload)
            .await
            .unwrap();

        assert_eq!(created.order.subtotal, Decimal::ZERO);
        assert_eq!(created.order.shipping_fee, Decimal::ZERO);
        assert_eq!(created.order.total, Decimal::ZERO);
        assert_eq!(created.order.payment_method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_entity_id("ORD", Utc::now());
        let mut parts = id.split('-');
        assert_eq!(parts.next(), Some("ORD"));
        let millis = parts.next().unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(parts.next(), None);
    }
}
