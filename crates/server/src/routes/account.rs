//! Account handlers: signup, signin, profile, and caller-scoped listings.
//!
//! Accounts live on the hosted auth platform; these handlers are thin
//! passthroughs plus the customer-number derivation at signup. User-scoped
//! listings resolve the caller's bearer token to a platform user and filter
//! the store by `userId`.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::extract::Json;
use crate::kv::keys;
use crate::middleware::BearerToken;
use crate::models::{Invoice, Order};
use crate::services::auth::UserRecord;
use crate::services::customer_number;
use crate::state::AppState;

use super::decode_records;

/// Signup payload. Address fields are optional profile metadata.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    street: String,
    #[serde(default)]
    house_number: String,
    #[serde(default)]
    address_extra: String,
    #[serde(default)]
    postal_code: String,
    #[serde(default)]
    city: String,
}

/// Signup response: the platform user plus the derived customer number.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    success: bool,
    user: UserRecord,
    customer_number: String,
}

/// Create an account and assign its customer number.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields: email, password".to_string(),
        ));
    }

    // Assigned once here; profile updates never regenerate it. Collisions
    // in the random suffix are possible and accepted - this is a display
    // identifier, not a key.
    let customer_number = customer_number::generate(&payload.city);

    let metadata = json!({
        "name": payload.name,
        "phone": payload.phone,
        "street": payload.street,
        "houseNumber": payload.house_number,
        "addressExtra": payload.address_extra,
        "postalCode": payload.postal_code,
        "city": payload.city,
        "customerNumber": customer_number.as_str(),
    });

    let user = state
        .auth()
        .create_user(&payload.email, &payload.password, &metadata)
        .await?;
    info!(user_id = %user.id, customer_number = %customer_number, "Account created");

    Ok(Json(SignupResponse {
        success: true,
        user,
        customer_number,
    }))
}

/// Signin payload.
#[derive(Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Session envelope; the platform session object passes through verbatim.
#[derive(Serialize)]
pub struct SessionEnvelope {
    session: Value,
}

/// Password login passthrough.
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<SessionEnvelope>> {
    let session = state
        .auth()
        .sign_in(&payload.email, &payload.password)
        .await?;
    Ok(Json(SessionEnvelope { session }))
}

/// User envelope for profile responses.
#[derive(Serialize)]
pub struct UserEnvelope {
    user: UserRecord,
}

/// Read the authenticated caller's profile.
pub async fn profile(
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> Result<Json<UserEnvelope>> {
    let user = state.auth().user_from_token(&token).await?;
    Ok(Json(UserEnvelope { user }))
}

/// Profile update payload. Only provided fields are overwritten.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    name: Option<String>,
    phone: Option<String>,
    street: Option<String>,
    house_number: Option<String>,
    address_extra: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
}

/// Update the authenticated caller's profile metadata.
///
/// The customer number is excluded from the merge: it is assigned at
/// signup and never regenerated.
pub async fn update_profile(
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserEnvelope>> {
    let user = state.auth().user_from_token(&token).await?;

    let mut metadata = match user.user_metadata {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    let updates = [
        ("name", payload.name),
        ("phone", payload.phone),
        ("street", payload.street),
        ("houseNumber", payload.house_number),
        ("addressExtra", payload.address_extra),
        ("postalCode", payload.postal_code),
        ("city", payload.city),
    ];
    for (field, value) in updates {
        if let Some(value) = value {
            metadata.insert(field.to_string(), Value::String(value));
        }
    }

    let updated = state
        .auth()
        .update_user_metadata(&user.id, &Value::Object(metadata))
        .await?;

    Ok(Json(UserEnvelope { user: updated }))
}

/// List the caller's orders, newest first.
pub async fn my_orders(
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let user = state.auth().user_from_token(&token).await?;

    let values = state.store().scan_by_prefix(keys::ORDER).await?;
    let mut orders: Vec<Order> = decode_records(values, "order");
    orders.retain(|order| order.user_id.as_deref() == Some(user.id.as_str()));
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));

    Ok(Json(orders))
}

/// List the caller's invoices, newest first.
pub async fn my_invoices(
    BearerToken(token): BearerToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<Invoice>>> {
    let user = state.auth().user_from_token(&token).await?;

    let values = state.store().scan_by_prefix(keys::INVOICE).await?;
    let mut invoices: Vec<Invoice> = decode_records(values, "invoice");
    invoices.retain(|invoice| invoice.user_id.as_deref() == Some(user.id.as_str()));
    invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(invoices))
}
