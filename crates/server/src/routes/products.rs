//! Product catalog handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use aster_core::{ProductId, money};

use crate::error::{ApiError, Result};
use crate::extract::Json;
use crate::kv::keys;
use crate::middleware::RequireAdminAuth;
use crate::models::Product;
use crate::state::AppState;

use super::{MessageResponse, decode_records};

/// Largest accepted embedded image, estimated from the base64 payload.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Create-product payload. Presence of name/price/image/category is
/// validated by the handler, not serde, so the error matches the API
/// contract.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    colors: String,
    #[serde(default)]
    sizes: String,
}

/// Envelope for create/update responses.
#[derive(Serialize)]
pub struct ProductEnvelope {
    success: bool,
    product: Product,
}

/// List all products.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let values = state.store().scan_by_prefix(keys::PRODUCT).await?;
    Ok(Json(decode_records(values, "product")))
}

/// Fetch one product.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let value = state
        .store()
        .get(&keys::product(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(serde_json::from_value(value)?))
}

/// Create a product.
pub async fn create(
    _admin: RequireAdminAuth,
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductEnvelope>)> {
    if payload.name.trim().is_empty()
        || payload.price.is_null()
        || payload.image.is_empty()
        || payload.category.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Missing required fields: name, price, image, category".to_string(),
        ));
    }

    let price = money::parse_strict(&payload.price)
        .ok_or_else(|| ApiError::Validation("price must be numeric".to_string()))?;

    check_image_size(&payload.image)?;

    let product = Product {
        id: ProductId::new(Uuid::new_v4().to_string()),
        name: payload.name,
        price,
        description: payload.description,
        image: payload.image,
        category: payload.category,
        colors: payload.colors,
        sizes: payload.sizes,
        created_at: Utc::now(),
        updated_at: None,
    };

    state
        .store()
        .set(&keys::product(&product.id), serde_json::to_value(&product)?)
        .await?;
    info!(product_id = %product.id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductEnvelope {
            success: true,
            product,
        }),
    ))
}

/// Merge-update a product. Incoming fields overwrite the stored record;
/// the identifier is preserved and `updatedAt` stamped. Last writer wins;
/// there is no concurrency token.
pub async fn update(
    _admin: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ProductEnvelope>> {
    let key = keys::product(&id);
    let existing = state
        .store()
        .get(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    let Value::Object(mut record) = existing else {
        return Err(ApiError::Internal(format!("corrupt product record {id}")));
    };
    let Value::Object(updates) = body else {
        return Err(ApiError::Validation("Expected a JSON object".to_string()));
    };

    // A present-but-unparseable price is a caller error; an absent price
    // keeps the stored value.
    let price_override = updates
        .get("price")
        .map(|raw| {
            money::parse_strict(raw)
                .ok_or_else(|| ApiError::Validation("price must be numeric".to_string()))
        })
        .transpose()?;

    if let Some(image) = updates.get("image").and_then(Value::as_str) {
        check_image_size(image)?;
    }

    for (field, value) in updates {
        if field == "id" {
            continue;
        }
        record.insert(field, value);
    }
    record.insert("id".to_string(), Value::String(id));
    if let Some(price) = price_override {
        record.insert("price".to_string(), serde_json::to_value(price)?);
    }
    record.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);

    let product: Product = serde_json::from_value(Value::Object(record))
        .map_err(|err| ApiError::Validation(format!("Invalid product fields: {err}")))?;

    state
        .store()
        .set(&key, serde_json::to_value(&product)?)
        .await?;
    info!(product_id = %product.id, "Product updated");

    Ok(Json(ProductEnvelope {
        success: true,
        product,
    }))
}

/// Delete a product.
pub async fn remove(
    _admin: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let key = keys::product(&id);
    if state.store().get(&key).await?.is_none() {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    state.store().delete(&key).await?;
    info!(product_id = %id, "Product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

/// Reject oversized embedded images. The base64 payload of a data URL is
/// roughly 4/3 of the decoded size.
fn check_image_size(image: &str) -> Result<()> {
    if image.starts_with("data:image") && image.len() * 3 / 4 > MAX_IMAGE_BYTES {
        return Err(ApiError::Validation(
            "Image too large: must be less than 5MB".to_string(),
        ));
    }
    Ok(())
}
