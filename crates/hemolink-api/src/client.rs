//! Typed clients over the verb facade: one for the ordinary user session,
//! one for the admin console. Both share a credential store but own
//! independent scopes and refresh coordinators.

use std::sync::Arc;

use hemolink_client_core::{
    BloodGroup, CredentialKind, CredentialStore, LoginIdentifier, SessionScope,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{
    Account, AccountUpdate, AdminUser, AdminUserUpdate, BloodRequest, BloodRequestCreate,
    DonationCreate, DonationRecord, DonorMessage, DonorRecord, InventoryEntry, InventoryUpsert,
    LoginRequest, Notification, Profile, ProfileUpdate, RegisterRequest, TokenPair,
    UsernameAvailability,
};

/// Optional filters for the donor search endpoint. Empty filters are left
/// out of the query string entirely.
#[derive(Debug, Clone, Default)]
pub struct DonorSearchFilter {
    pub blood_group: Option<BloodGroup>,
    pub district: Option<String>,
}

impl DonorSearchFilter {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(group) = self.blood_group {
            query.push(("blood_group".to_string(), group.as_str().to_string()));
        }
        if let Some(district) = self
            .district
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            query.push(("district".to_string(), district.to_string()));
        }
        query
    }
}

/// User-session client for the donation platform.
#[derive(Debug, Clone)]
pub struct HemolinkClient {
    api: ApiClient,
}

impl HemolinkClient {
    pub fn new(base_url: &str, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(base_url, SessionScope::User, store)?,
        })
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.api = self.api.with_timeout_ms(timeout_ms);
        self
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn donor_message_path(donor_id: i64) -> String {
        format!("/api/donors/donors/{donor_id}/message/")
    }

    #[must_use]
    pub fn request_accept_path(request_id: i64) -> String {
        format!("/api/requests/{request_id}/accept/")
    }

    #[must_use]
    pub fn request_collected_path(request_id: i64) -> String {
        format!("/api/requests/{request_id}/collected/")
    }

    /// Exchange credentials for a token pair and persist the session.
    pub async fn login(
        &self,
        identifier: LoginIdentifier,
        password: &str,
    ) -> Result<TokenPair, ApiError> {
        let tokens: TokenPair = self
            .api
            .post("/api/login/", &LoginRequest::new(identifier, password))
            .await?;
        self.api
            .store()
            .store_session(SessionScope::User, &tokens.access, &tokens.refresh);
        Ok(tokens)
    }

    /// Drop the stored user session. Client-side only; tokens simply expire
    /// on the backend.
    pub fn logout(&self) {
        self.api.store().clear(SessionScope::User);
    }

    /// Mirror the current user tokens into the admin scope when the account
    /// is staff, so an admin who used the ordinary login can reach the admin
    /// APIs. Returns whether the mirror happened.
    pub async fn sync_admin_session(&self) -> Result<bool, ApiError> {
        let account = self.me().await?;
        if !account.is_admin() {
            return Ok(false);
        }
        let store = self.api.store();
        let Some(access) = store.get(SessionScope::User, CredentialKind::AccessToken) else {
            return Ok(false);
        };
        let refresh = store
            .get(SessionScope::User, CredentialKind::RefreshToken)
            .unwrap_or_default();
        store.store_session(SessionScope::Admin, &access, &refresh);
        Ok(true)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.api.post_unit("/api/auth/register/", request).await
    }

    pub async fn username_available(&self, username: &str) -> Result<bool, ApiError> {
        let availability: UsernameAvailability = self
            .api
            .get_query(
                "/api/auth/username-available/",
                vec![("username".to_string(), username.trim().to_string())],
            )
            .await?;
        Ok(availability.available)
    }

    pub async fn me(&self) -> Result<Account, ApiError> {
        self.api.get("/api/auth/me/").await
    }

    pub async fn update_me(&self, update: &AccountUpdate) -> Result<Account, ApiError> {
        self.api.put("/api/auth/me/", update).await
    }

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.api.get("/api/profile/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.api.put_unit("/api/profile/", update).await
    }

    pub async fn donors(&self) -> Result<Vec<DonorRecord>, ApiError> {
        self.api.get("/api/donors/").await
    }

    pub async fn search_donors(
        &self,
        filter: &DonorSearchFilter,
    ) -> Result<Vec<DonorRecord>, ApiError> {
        self.api
            .get_query("/api/donors/search/", filter.query())
            .await
    }

    pub async fn message_donor(
        &self,
        donor_id: i64,
        message: &DonorMessage,
    ) -> Result<(), ApiError> {
        self.api
            .post_unit(&Self::donor_message_path(donor_id), message)
            .await
    }

    /// Create a blood request. The form required a blood group and contact
    /// info before it would submit; the same check happens here.
    pub async fn create_request(&self, request: &BloodRequestCreate) -> Result<(), ApiError> {
        if request.blood_group.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "blood group is required".to_string(),
            ));
        }
        if request.contact_info.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "contact info is required".to_string(),
            ));
        }
        self.api.post_unit("/api/requests/", request).await
    }

    pub async fn my_requests(&self) -> Result<Vec<BloodRequest>, ApiError> {
        self.api.get("/api/requests/mine/").await
    }

    pub async fn accept_request(&self, request_id: i64) -> Result<(), ApiError> {
        self.api
            .post_empty(&Self::request_accept_path(request_id))
            .await
    }

    pub async fn mark_request_collected(&self, request_id: i64) -> Result<(), ApiError> {
        self.api
            .post_empty(&Self::request_collected_path(request_id))
            .await
    }

    pub async fn inventory(&self) -> Result<Vec<InventoryEntry>, ApiError> {
        self.api.get("/api/inventory/").await
    }

    pub async fn upsert_inventory(&self, entry: &InventoryUpsert) -> Result<(), ApiError> {
        self.api.post_unit("/api/inventory/", entry).await
    }

    pub async fn donations(&self) -> Result<Vec<DonationRecord>, ApiError> {
        self.api.get("/api/donations/").await
    }

    pub async fn record_donation(&self, donation: &DonationCreate) -> Result<(), ApiError> {
        self.api.post_unit("/api/donations/", donation).await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.api.get("/api/notifications/").await
    }

    pub async fn dashboard_summary(&self) -> Result<Value, ApiError> {
        self.api.get("/api/dashboard-summary/").await
    }

    pub async fn analytics(&self) -> Result<Value, ApiError> {
        self.api.get("/api/analytics/").await
    }
}

/// Admin-console client. Isolated from the user session: a failed admin
/// refresh can never clear or read user-scope tokens.
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiClient,
}

impl AdminClient {
    pub fn new(base_url: &str, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(base_url, SessionScope::Admin, store)?,
        })
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.api = self.api.with_timeout_ms(timeout_ms);
        self
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn user_path(user_id: i64) -> String {
        format!("/api/auth/admin/users/{user_id}/")
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let identifier = LoginIdentifier::classify(username)?;
        let tokens: TokenPair = self
            .api
            .post("/api/admin/login/", &LoginRequest::new(identifier, password))
            .await?;
        self.api
            .store()
            .store_session(SessionScope::Admin, &tokens.access, &tokens.refresh);
        Ok(tokens)
    }

    pub fn logout(&self) {
        self.api.store().clear(SessionScope::Admin);
    }

    pub async fn users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.api.get("/api/auth/admin/users/").await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update: &AdminUserUpdate,
    ) -> Result<(), ApiError> {
        self.api.put_unit(&Self::user_path(user_id), update).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.api.delete(&Self::user_path(user_id)).await
    }

    pub async fn analytics(&self) -> Result<Value, ApiError> {
        self.api.get("/api/analytics/").await
    }
}

#[cfg(test)]
mod tests {
    use hemolink_client_core::BloodGroup;

    use super::{AdminClient, DonorSearchFilter, HemolinkClient};

    #[test]
    fn path_helpers_are_deterministic() {
        assert_eq!(
            HemolinkClient::donor_message_path(7),
            "/api/donors/donors/7/message/"
        );
        assert_eq!(
            HemolinkClient::request_accept_path(42),
            "/api/requests/42/accept/"
        );
        assert_eq!(
            HemolinkClient::request_collected_path(42),
            "/api/requests/42/collected/"
        );
        assert_eq!(AdminClient::user_path(3), "/api/auth/admin/users/3/");
    }

    #[test]
    fn donor_filter_omits_empty_values() {
        let empty = DonorSearchFilter::default();
        assert!(empty.query().is_empty());

        let blank_district = DonorSearchFilter {
            blood_group: None,
            district: Some("   ".to_string()),
        };
        assert!(blank_district.query().is_empty());

        let full = DonorSearchFilter {
            blood_group: Some(BloodGroup::ONegative),
            district: Some("Dhaka".to_string()),
        };
        assert_eq!(
            full.query(),
            vec![
                ("blood_group".to_string(), "O-".to_string()),
                ("district".to_string(), "Dhaka".to_string()),
            ]
        );
    }
}
