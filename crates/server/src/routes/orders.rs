//! Order handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use aster_core::OrderStatus;

use crate::error::{ApiError, Result};
use crate::extract::Json;
use crate::kv::keys;
use crate::middleware::RequireAdminAuth;
use crate::models::Order;
use crate::services::orders::{CreateOrderRequest, CreatedOrder, OrderIngest};
use crate::state::AppState;

use super::{MessageResponse, decode_records};

/// Create an order and its derived invoice.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreatedOrder>)> {
    let created = OrderIngest::new(state.store(), state.notifier())
        .create(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List all orders, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let values = state.store().scan_by_prefix(keys::ORDER).await?;
    let mut orders: Vec<Order> = decode_records(values, "order");
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    Ok(Json(orders))
}

/// Fetch one order.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let value = state
        .store()
        .get(&keys::order(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(serde_json::from_value(value)?))
}

/// Status update payload.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    status: OrderStatus,
    #[serde(default)]
    tracking_number: Option<String>,
}

/// Update an order's status and, optionally, its tracking number.
///
/// Any status can follow any other; enum membership is the only check.
/// Last writer wins.
pub async fn update_status(
    _admin: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let key = keys::order(&id);
    let value = state
        .store()
        .get(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    let mut order: Order = serde_json::from_value(value)?;
    order.status = payload.status;
    if let Some(tracking) = payload.tracking_number {
        order.tracking_number = Some(tracking);
    }
    order.updated_at = Some(Utc::now());

    state
        .store()
        .set(&key, serde_json::to_value(&order)?)
        .await?;
    info!(order_id = %order.id, status = %order.status, "Order status updated");

    Ok(Json(order))
}

/// Hard-delete an order. The paired invoice is retained.
pub async fn remove(
    _admin: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let key = keys::order(&id);
    if state.store().get(&key).await?.is_none() {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    state.store().delete(&key).await?;
    info!(order_id = %id, "Order deleted");

    Ok(Json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}
