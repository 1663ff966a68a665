//! Authentication extractors.
//!
//! Two kinds of callers authenticate here:
//!
//! - Customers present a platform-issued access token; [`BearerToken`]
//!   extracts it and the handler forwards it to the auth platform.
//! - Back-office admins present a locally issued signed token (see
//!   [`crate::services::admin_token`]); [`RequireAdminAuth`] verifies it
//!   server-side before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;

use crate::error::ApiError;
use crate::services::admin_token;
use crate::state::AppState;

/// Extractor for the raw bearer token of a user-scoped route.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(
///     BearerToken(token): BearerToken,
///     State(state): State<AppState>,
/// ) -> Result<Json<UserEnvelope>> {
///     let user = state.auth().user_from_token(&token).await?;
///     // ...
/// }
/// ```
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_value(parts)
            .map(Self)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))
    }
}

/// Extractor that requires a valid admin session token.
///
/// Mutating back-office routes (catalog writes, order status changes,
/// order deletes) and the customer listing all pass through here.
pub struct RequireAdminAuth;

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_value(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing admin token".to_string()))?;

        admin_token::verify(
            state.config().admin.token_secret_bytes(),
            &token,
            Utc::now(),
        )
        .map_err(|_| ApiError::Unauthorized("Invalid or expired admin token".to_string()))?;

        Ok(Self)
    }
}

/// Pull `Bearer <token>` out of the Authorization header.
fn bearer_value(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
}
