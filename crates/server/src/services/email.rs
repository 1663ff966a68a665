//! Email client for order notifications.
//!
//! Mail goes out through a hosted HTTP delivery provider (Resend-compatible
//! JSON API, bearer key) with Askama HTML and plain-text templates. The
//! request timeout is deliberately short: notification delivery is
//! best-effort and must never hold anything else up.

use std::time::Duration;

use askama::Template;
use chrono::SecondsFormat;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::EmailConfig;
use crate::models::Order;

/// Hard cap on a single delivery attempt.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(8);

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// HTTP request failed (connect, timeout, ...).
    #[error("email request failed: {0}")]
    Request(String),

    /// Provider answered with a non-success status.
    #[error("email provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Pre-formatted line item for the email templates.
struct LineView {
    name: String,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
    unit_price: String,
    line_total: String,
}

/// Pre-formatted order data shared by the HTML and text templates.
struct OrderEmailView {
    order_id: String,
    order_date: String,
    payment_method: &'static str,
    customer_name: String,
    email: String,
    address_line: String,
    items: Vec<LineView>,
    subtotal: String,
    shipping_fee: String,
    total: String,
}

impl From<&Order> for OrderEmailView {
    fn from(order: &Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| LineView {
                name: item.name.clone(),
                quantity: item.quantity,
                size: item.selected_size.clone(),
                color: item.selected_color.clone(),
                unit_price: item.price.to_string(),
                line_total: item.line_total().to_string(),
            })
            .collect();

        Self {
            order_id: order.id.to_string(),
            order_date: order.order_date.to_rfc3339_opts(SecondsFormat::Secs, true),
            payment_method: order.payment_method.label(),
            customer_name: order.customer_name.clone(),
            email: order.email.clone(),
            address_line: format!(
                "{} {}, {} {}",
                order.street, order.house_number, order.postal_code, order.city
            ),
            items,
            subtotal: order.subtotal.to_string(),
            shipping_fee: order.shipping_fee.to_string(),
            total: order.total.to_string(),
        }
    }
}

/// HTML body for the new-order notification.
#[derive(Template)]
#[template(path = "email/order_notification.html")]
struct OrderNotificationHtml<'a> {
    view: &'a OrderEmailView,
}

/// Plain text body for the new-order notification.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    view: &'a OrderEmailView,
}

/// Outbound payload for the delivery provider.
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: &'a str,
    subject: String,
    html: String,
    text: String,
}

/// Client for the hosted email delivery provider.
#[derive(Clone)]
pub struct EmailClient {
    http: Client,
    api_url: String,
    api_key: SecretString,
    from: String,
    notify_to: String,
}

impl std::fmt::Debug for EmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("from", &self.from)
            .field("notify_to", &self.notify_to)
            .finish_non_exhaustive()
    }
}

impl EmailClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &EmailConfig) -> Self {
        let http = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from: config.from.to_string(),
            notify_to: config.notify_to.to_string(),
        }
    }

    /// Send the new-order notification to the shop admin.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] if rendering or delivery fails. Callers on
    /// the order path log and swallow this; it never reaches a customer.
    pub async fn send_order_notification(&self, order: &Order) -> Result<(), EmailError> {
        let view = OrderEmailView::from(order);
        let html = OrderNotificationHtml { view: &view }.render()?;
        let text = OrderNotificationText { view: &view }.render()?;

        let payload = SendEmailRequest {
            from: format!("Aster Boutique <{}>", self.from),
            to: self.notify_to.as_str(),
            subject: format!("New order {} - EUR {}", order.id, order.total),
            html,
            text,
        };

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(order_id = %order.id, "Provider accepted order notification");
        Ok(())
    }
}
