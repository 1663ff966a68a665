//! Customer projection.
//!
//! Customers are not locally owned records: the auth platform is the source
//! of truth, and this view is derived read-only from platform user records
//! for the back office.

use serde::{Deserialize, Serialize};

use crate::services::auth::UserRecord;

/// Back-office view of a platform user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub city: String,
    pub customer_number: String,
    pub phone: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub created_at: Option<String>,
}

impl From<&UserRecord> for CustomerView {
    fn from(user: &UserRecord) -> Self {
        let meta = |field: &str| user.metadata_str(field).unwrap_or("").to_string();
        let meta_or_na =
            |field: &str| user.metadata_str(field).unwrap_or("N/A").to_string();

        Self {
            id: user.id.clone(),
            email: user.email.clone().unwrap_or_else(|| "N/A".to_string()),
            name: meta_or_na("name"),
            city: meta_or_na("city"),
            customer_number: meta_or_na("customerNumber"),
            phone: meta("phone"),
            street: meta("street"),
            house_number: meta("houseNumber"),
            postal_code: meta("postalCode"),
            created_at: user.created_at.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_projection_from_platform_user() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": "u-1",
            "email": "a@x.com",
            "user_metadata": {
                "name": "Anna",
                "city": "Warendorf",
                "customerNumber": "WD482913",
                "houseNumber": "12b"
            },
            "created_at": "2025-10-02T12:00:00Z"
        }))
        .unwrap();

        let view = CustomerView::from(&user);
        assert_eq!(view.name, "Anna");
        assert_eq!(view.customer_number, "WD482913");
        assert_eq!(view.house_number, "12b");
        // missing optional fields come through as empty strings
        assert_eq!(view.phone, "");
    }

    #[test]
    fn test_projection_defaults_missing_identity_to_na() {
        let user: UserRecord = serde_json::from_value(json!({"id": "u-2"})).unwrap();
        let view = CustomerView::from(&user);
        assert_eq!(view.email, "N/A");
        assert_eq!(view.name, "N/A");
        assert_eq!(view.customer_number, "N/A");
    }
}
