//! Integration tests for Aster Boutique.
//!
//! # Running Tests
//!
//! ```bash
//! # Create the kv_store table and start the server
//! cargo run -p aster-cli -- migrate
//! cargo run -p aster-server
//!
//! # Run integration tests against it
//! cargo test -p aster-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running server
//! (and, for the account tests, a reachable auth platform).

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("ASTER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
