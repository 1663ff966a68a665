//! Best-effort order notification dispatcher.
//!
//! Order creation must never wait for, or fail because of, the admin
//! notification email. Instead of an inline fire-and-forget call, the
//! dispatcher is an explicit outbound queue: a bounded channel feeding one
//! background worker that delivers with bounded retry and backoff. Every
//! outcome is logged; none is ever propagated to a request.

use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info, warn};

use crate::config::EmailConfig;
use crate::models::Order;
use crate::services::email::EmailClient;

/// Notifications waiting for the worker. If the queue is full the newest
/// notification is dropped - the order itself is already durable.
const QUEUE_CAPACITY: usize = 64;

/// Delivery attempts per notification.
const MAX_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt; doubles per retry.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Handle for enqueueing notifications. Cheap to clone; all clones feed
/// the same worker.
#[derive(Clone)]
pub struct Notifier {
    tx: Option<mpsc::Sender<Order>>,
}

impl Notifier {
    /// Start the dispatcher worker, or a no-op handle when email is not
    /// configured.
    #[must_use]
    pub fn spawn(config: Option<&EmailConfig>) -> Self {
        let Some(config) = config else {
            info!("Email notifications disabled (no EMAIL_API_KEY)");
            return Self { tx: None };
        };

        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(worker(rx, EmailClient::new(config)));

        Self { tx: Some(tx) }
    }

    /// A handle that drops everything. For tests and disabled setups.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    /// Hand a completed order to the dispatcher. Never blocks and never
    /// fails the caller.
    pub fn notify_order_created(&self, order: Order) {
        let Some(tx) = &self.tx else {
            debug!(order_id = %order.id, "Notifications disabled; skipping");
            return;
        };

        if let Err(err) = tx.try_send(order) {
            warn!(error = %err, "Notification queue full; dropping order notification");
        }
    }
}

async fn worker(mut rx: mpsc::Receiver<Order>, client: EmailClient) {
    info!("Order notification worker started");
    while let Some(order) = rx.recv().await {
        deliver(&client, &order).await;
    }
    debug!("Order notification worker shutting down");
}

/// Attempt delivery with bounded retry. Failures are logged and absorbed.
async fn deliver(client: &EmailClient, order: &Order) {
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=MAX_ATTEMPTS {
        match client.send_order_notification(order).await {
            Ok(()) => {
                info!(order_id = %order.id, attempt, "Order notification sent");
                return;
            }
            Err(err) => {
                warn!(
                    order_id = %order.id,
                    attempt,
                    error = %err,
                    "Order notification attempt failed"
                );
                if attempt < MAX_ATTEMPTS {
                    sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }

    error!(
        order_id = %order.id,
        attempts = MAX_ATTEMPTS,
        "Order notification given up"
    );
}
