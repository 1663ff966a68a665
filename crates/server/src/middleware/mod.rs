//! Request-level extractors for authentication.

pub mod auth;

pub use auth::{BearerToken, RequireAdminAuth};
