//! Invoice handlers. Read-only: invoices are created alongside orders and
//! never updated.

use axum::extract::{Path, State};

use crate::error::{ApiError, Result};
use crate::extract::Json;
use crate::kv::keys;
use crate::models::Invoice;
use crate::state::AppState;

use super::decode_records;

/// List all invoices, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Invoice>>> {
    let values = state.store().scan_by_prefix(keys::INVOICE).await?;
    let mut invoices: Vec<Invoice> = decode_records(values, "invoice");
    invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(invoices))
}

/// Fetch one invoice.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>> {
    let value = state
        .store()
        .get(&keys::invoice(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;

    Ok(Json(serde_json::from_value(value)?))
}
