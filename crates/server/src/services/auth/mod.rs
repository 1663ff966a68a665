//! Hosted auth platform client.
//!
//! Accounts, sessions, and user metadata live on a GoTrue-compatible
//! platform; this client wraps the handful of REST calls the storefront
//! needs. The service-role key authorizes the admin endpoints; user-scoped
//! lookups forward the caller's bearer token instead.

mod error;
mod types;

pub use error::AuthError;
pub use types::UserRecord;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::AuthPlatformConfig;
use types::{CreateUserRequest, ListUsersResponse, PasswordGrantRequest, UpdateUserRequest};

/// Request timeout for platform calls on the request path. Exceeding it
/// surfaces as a 504 to the caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Auth platform API client.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    service_key: SecretString,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &AuthPlatformConfig) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        }
    }

    /// Create a user with profile metadata, pre-confirmed.
    ///
    /// # Errors
    ///
    /// `AuthError::Rejected` when the platform refuses (duplicate email,
    /// weak password, ...); transport variants otherwise.
    #[instrument(skip(self, password, metadata), fields(email = %email))]
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        metadata: &Value,
    ) -> Result<UserRecord, AuthError> {
        let body = CreateUserRequest {
            email,
            password,
            user_metadata: metadata,
            email_confirm: true,
        };

        let response = self
            .http
            .post(self.endpoint("admin/users"))
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::from_transport(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let user = response
            .json::<UserRecord>()
            .await
            .map_err(|e| AuthError::Response(e.to_string()))?;
        debug!(user_id = %user.id, "Created platform user");
        Ok(user)
    }

    /// Password sign-in. Returns the platform's session object verbatim.
    ///
    /// # Errors
    ///
    /// `AuthError::Rejected` on bad credentials; transport variants
    /// otherwise.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Value, AuthError> {
        let body = PasswordGrantRequest { email, password };

        let response = self
            .http
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", self.service_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::from_transport(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AuthError::Response(e.to_string()))
    }

    /// Resolve a caller's bearer token to their user record.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidToken` when the token does not resolve; transport
    /// variants otherwise.
    #[instrument(skip(self, access_token))]
    pub async fn user_from_token(&self, access_token: &str) -> Result<UserRecord, AuthError> {
        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::from_transport(&e))?;

        match response.status() {
            status if status.is_success() => response
                .json::<UserRecord>()
                .await
                .map_err(|e| AuthError::Response(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            _ => Err(rejection(response).await),
        }
    }

    /// Replace a user's metadata through the admin API.
    ///
    /// # Errors
    ///
    /// Transport and rejection variants as for the other admin calls.
    #[instrument(skip(self, metadata), fields(user_id = %user_id))]
    pub async fn update_user_metadata(
        &self,
        user_id: &str,
        metadata: &Value,
    ) -> Result<UserRecord, AuthError> {
        let body = UpdateUserRequest {
            user_metadata: metadata,
        };

        let response = self
            .http
            .put(self.endpoint(&format!("admin/users/{user_id}")))
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::from_transport(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response
            .json::<UserRecord>()
            .await
            .map_err(|e| AuthError::Response(e.to_string()))
    }

    /// List all platform users.
    ///
    /// # Errors
    ///
    /// Transport and rejection variants as for the other admin calls.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        let response = self
            .http
            .get(self.endpoint("admin/users"))
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .send()
            .await
            .map_err(|e| AuthError::from_transport(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let listing = response
            .json::<ListUsersResponse>()
            .await
            .map_err(|e| AuthError::Response(e.to_string()))?;
        Ok(listing.users)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

/// Turn a non-success platform response into an error, extracting the
/// platform's message where one exists.
async fn rejection(response: reqwest::Response) -> AuthError {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    let message = ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_str))
        .map_or_else(|| format!("status {status}"), ToOwned::to_owned);

    if status.is_client_error() {
        AuthError::Rejected(message)
    } else {
        AuthError::Response(message)
    }
}
