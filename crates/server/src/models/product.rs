//! Product catalog records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aster_core::ProductId;

/// A catalog product.
///
/// Colors and sizes are comma-separated option lists, kept as entered by the
/// back office. Updates are full-record overwrites merged with the existing
/// fields; there is no versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub sizes: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
