//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//!
//! # Catalog
//! GET    /products               - List all products
//! GET    /products/{id}          - Fetch one product
//! POST   /products               - Create product            (admin token)
//! PUT    /products/{id}          - Merge-update product      (admin token)
//! DELETE /products/{id}          - Delete product            (admin token)
//!
//! # Orders
//! GET    /orders                 - List all orders, newest first
//! GET    /orders/{id}            - Fetch one order
//! POST   /orders                 - Create order + invoice
//! PATCH  /orders/{id}/status     - Update status/tracking    (admin token)
//! DELETE /orders/{id}            - Hard delete               (admin token)
//!
//! # Invoices (read-only; created alongside orders)
//! GET    /invoices               - List all invoices, newest first
//! GET    /invoices/{id}          - Fetch one invoice
//!
//! # Accounts (auth platform passthrough)
//! POST   /signup                 - Create account, derive customer number
//! POST   /signin                 - Password login
//! GET    /profile                - Read own profile          (bearer)
//! PUT    /profile                - Update own profile        (bearer)
//! GET    /my-orders              - Own orders, newest first  (bearer)
//! GET    /my-invoices            - Own invoices, newest first (bearer)
//!
//! # Back office
//! POST   /admin/login            - Issue admin session token
//! GET    /admin/customers        - Customer projections      (admin token)
//! ```

pub mod account;
pub mod admin;
pub mod health;
pub mod invoices;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::state::AppState;

/// Message envelope for delete endpoints.
#[derive(Serialize)]
pub(crate) struct MessageResponse {
    pub message: String,
}

/// Decode raw store values into typed records, skipping anything that no
/// longer matches the schema (logged, not fatal - one bad record must not
/// take down a listing).
pub(crate) fn decode_records<T: DeserializeOwned>(values: Vec<Value>, kind: &'static str) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(kind, error = %err, "Skipping undecodable record");
                None
            }
        })
        .collect()
}

/// Create the product routes router.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get_one)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the order routes router.
fn order_routes() -> Router<AppState> {
    use axum::routing::patch;

    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::get_one).delete(orders::remove))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the invoice routes router.
fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(invoices::list))
        .route("/{id}", get(invoices::get_one))
}

/// Create the back-office routes router.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/customers", get(admin::customers))
}

/// JSON 404 for unmatched paths; the error envelope stays consistent even
/// off the routing table.
async fn not_found(uri: axum::http::Uri) -> crate::error::ApiError {
    crate::error::ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/invoices", invoice_routes())
        .route("/signup", post(account::signup))
        .route("/signin", post(account::signin))
        .route(
            "/profile",
            get(account::profile).put(account::update_profile),
        )
        .route("/my-orders", get(account::my_orders))
        .route("/my-invoices", get(account::my_invoices))
        .nest("/admin", admin_routes())
        .fallback(not_found)
}
