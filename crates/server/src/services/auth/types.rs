//! Auth platform wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user record as the platform returns it.
///
/// Address fields, customer number and the rest of the profile live in
/// `user_metadata`, which the platform stores as free-form JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserRecord {
    /// Read a string field out of the user metadata.
    #[must_use]
    pub fn metadata_str(&self, field: &str) -> Option<&str> {
        self.user_metadata.get(field).and_then(Value::as_str)
    }
}

/// Envelope of the admin user-listing endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ListUsersResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Body for creating a user through the admin API.
#[derive(Debug, Serialize)]
pub(super) struct CreateUserRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub user_metadata: &'a Value,
    /// The storefront has no verification-mail flow; accounts are usable
    /// immediately.
    pub email_confirm: bool,
}

/// Body for the password sign-in grant.
#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for a metadata update through the admin API.
#[derive(Debug, Serialize)]
pub(super) struct UpdateUserRequest<'a> {
    pub user_metadata: &'a Value,
}
