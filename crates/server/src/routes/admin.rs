//! Back-office handlers: login and the customer listing.

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use axum::extract::State;
use chrono::Utc;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, Result};
use crate::extract::Json;
use crate::middleware::RequireAdminAuth;
use crate::models::CustomerView;
use crate::services::admin_token;
use crate::state::AppState;

/// Login payload.
#[derive(Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Login response carrying the signed session token.
#[derive(Serialize)]
pub struct AdminLoginResponse {
    success: bool,
    token: String,
}

/// Verify the back-office credential and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>> {
    let admin = &state.config().admin;

    let parsed = PasswordHash::new(admin.password_hash.expose_secret())
        .map_err(|err| ApiError::Internal(format!("stored admin hash is invalid: {err}")))?;
    let password_ok = Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed)
        .is_ok();

    if payload.username != admin.username || !password_ok {
        warn!("Failed admin login attempt");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = admin_token::issue(admin.token_secret_bytes(), Utc::now());
    info!("Admin session issued");

    Ok(Json(AdminLoginResponse {
        success: true,
        token,
    }))
}

/// Customer listing envelope.
#[derive(Serialize)]
pub struct CustomersResponse {
    customers: Vec<CustomerView>,
}

/// List all platform users as customer projections.
pub async fn customers(
    _admin: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<CustomersResponse>> {
    let users = state.auth().list_users().await?;
    let customers: Vec<CustomerView> = users.iter().map(CustomerView::from).collect();
    info!(count = customers.len(), "Listed customers");

    Ok(Json(CustomersResponse { customers }))
}
