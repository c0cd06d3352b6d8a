//! Wire types for the platform REST API.
//!
//! Response structs are tolerant: fields the backend may omit default to
//! `None` so a server-side addition never breaks decoding. Unspecified
//! aggregate payloads (analytics, dashboard summary) stay as raw JSON.

use chrono::{DateTime, NaiveDate, Utc};
use hemolink_client_core::LoginIdentifier;
use serde::{Deserialize, Serialize};

/// Bearer tokens issued by the login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
}

/// Login payload. The backend accepts either a username (or email) or a
/// full name, never both.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub password: String,
}

impl LoginRequest {
    #[must_use]
    pub fn new(identifier: LoginIdentifier, password: impl Into<String>) -> Self {
        let (username, full_name) = match identifier {
            LoginIdentifier::Username(value) => (Some(value), None),
            LoginIdentifier::FullName(value) => (None, Some(value)),
        };
        Self {
            username,
            full_name,
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub blood_group: String,
    /// `null` when the registrant declared no recent donation.
    pub last_donation: Option<NaiveDate>,
    pub district: String,
    pub share_phone: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameAvailability {
    pub available: bool,
}

/// The authenticated account record returned by `/api/auth/me/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl Account {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_phone: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub last_donation: Option<NaiveDate>,
}

/// Profile update. Fields are always serialized so an empty value can clear
/// a stored one (`null` on the wire).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub last_donation: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorRecord {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub last_donation: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonorMessage {
    pub contact: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BloodRequestCreate {
    pub blood_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub contact_info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: i64,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub hospital: String,
    pub blood_group: String,
    pub units_available: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryUpsert {
    pub hospital: String,
    pub blood_group: String,
    pub units_available: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub units_donated: Option<u32>,
    #[serde(default)]
    pub donation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationCreate {
    pub blood_group: String,
    pub hospital: String,
    pub units_donated: u32,
}

/// A notification about a blood request, optionally carrying an inline view
/// of the request it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub request_info: Option<NotificationRequestInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequestInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub last_donation: Option<NaiveDate>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Admin user update. Options serialize as `null` so the admin console can
/// clear a field, matching the backend's ignore-unchanged contract.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub last_donation: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use hemolink_client_core::LoginIdentifier;
    use serde_json::json;

    use super::{AdminUserUpdate, LoginRequest, RegisterRequest};

    #[test]
    fn login_request_sends_exactly_one_identifier_field() {
        let by_name = LoginRequest::new(
            LoginIdentifier::FullName("Ayesha Rahman".to_string()),
            "pw",
        );
        let encoded = serde_json::to_value(&by_name).expect("encode");
        assert_eq!(
            encoded,
            json!({"full_name": "Ayesha Rahman", "password": "pw"})
        );

        let by_username =
            LoginRequest::new(LoginIdentifier::Username("ayesha42".to_string()), "pw");
        let encoded = serde_json::to_value(&by_username).expect("encode");
        assert_eq!(encoded, json!({"username": "ayesha42", "password": "pw"}));
    }

    #[test]
    fn register_request_serializes_absent_donation_as_null() {
        let request = RegisterRequest {
            username: "ayesha42".to_string(),
            email: "ayesha@example.org".to_string(),
            password: "pw".to_string(),
            blood_group: "O+".to_string(),
            last_donation: None,
            district: "Dhaka".to_string(),
            share_phone: false,
        };
        let encoded = serde_json::to_value(&request).expect("encode");
        assert_eq!(encoded["last_donation"], serde_json::Value::Null);
    }

    #[test]
    fn admin_update_serializes_cleared_fields_as_null() {
        let update = AdminUserUpdate {
            email: Some("x@example.org".to_string()),
            phone: None,
            blood_group: None,
            district: None,
            last_donation: None,
            is_active: None,
        };
        let encoded = serde_json::to_value(&update).expect("encode");
        assert_eq!(encoded["phone"], serde_json::Value::Null);
        assert!(encoded.get("is_active").is_none());
    }
}
