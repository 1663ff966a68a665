//! Liveness endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::extract::Json;

/// Liveness response body.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    server: &'static str,
    version: &'static str,
}

/// Report liveness.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        server: "Aster Boutique API",
        version: env!("CARGO_PKG_VERSION"),
    })
}
