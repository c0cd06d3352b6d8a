//! Authenticated HTTP verb facade.
//!
//! Every request attaches the scope's current access token as a bearer
//! credential when one is stored. A 401 response triggers at most one
//! refresh exchange per failure storm (see [`crate::refresh`]) and exactly
//! one replay of the failed request with the renewed token; a second 401 on
//! the replay is terminal and surfaces to the caller unchanged. Transport
//! errors are never interpreted as auth failures.

use std::sync::Arc;
use std::time::Duration;

use hemolink_client_core::{CredentialKind, CredentialStore, SessionScope, normalize_base_url};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ApiError, http_error};
use crate::refresh::{RefreshGate, RefreshTicket};
use crate::types::{TokenRefreshRequest, TokenRefreshResponse};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";

/// Verb-level client bound to one session scope.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    scope: SessionScope,
    store: Arc<dyn CredentialStore>,
    gate: Arc<RefreshGate>,
    timeout: Duration,
    http: reqwest::Client,
}

#[derive(Debug)]
struct RequestPlan {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        scope: SessionScope,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            base_url,
            scope,
            store,
            gate: Arc::new(RefreshGate::new()),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            http: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms.max(250));
        self
    }

    #[must_use]
    pub fn scope(&self) -> SessionScope {
        self.scope
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<String> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('/') {
            Some(format!("{}{}", self.base_url, trimmed))
        } else {
            Some(format!("{}/{}", self.base_url, trimmed))
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(Method::GET, path, Vec::new(), None).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.request_json(Method::GET, path, query, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.request_json(Method::POST, path, Vec::new(), Some(body))
            .await
    }

    /// POST whose response body the caller does not consume.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request_unit(Method::POST, path, Some(body)).await
    }

    /// Bodyless POST, used by action endpoints such as request accept.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.request_unit(Method::POST, path, None).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.request_json(Method::PUT, path, Vec::new(), Some(body))
            .await
    }

    pub async fn put_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request_unit(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_unit(Method::DELETE, path, None).await
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let plan = self.plan(method, path, query, body)?;
        let response = self.execute(&plan).await?;
        decode_json_response(response).await
    }

    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        let plan = self.plan(method, path, Vec::new(), body)?;
        let response = self.execute(&plan).await?;
        discard_response(response).await
    }

    fn plan(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<RequestPlan, ApiError> {
        let url = self.endpoint(path).ok_or(ApiError::InvalidPath)?;
        Ok(RequestPlan {
            method,
            url,
            query,
            body,
        })
    }

    /// Send with the stored bearer, recovering from a single 401 via the
    /// refresh gate. Returns the final response; status decoding is left to
    /// the caller so a terminal 401 surfaces as an ordinary HTTP error.
    async fn execute(&self, plan: &RequestPlan) -> Result<reqwest::Response, ApiError> {
        let bearer = self.store.get(self.scope, CredentialKind::AccessToken);
        let response = self.send_attempt(plan, bearer.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let original_body = response.bytes().await.unwrap_or_default();
        let original = http_error(StatusCode::UNAUTHORIZED, &original_body);

        // No refresh token for this scope: nothing to exchange, surface the
        // failure as-is.
        let Some(refresh_token) = self.store.get(self.scope, CredentialKind::RefreshToken) else {
            return Err(original);
        };

        let renewed = match self.gate.join() {
            RefreshTicket::Leader => {
                tracing::debug!(scope = self.scope.as_str(), "access token refresh started");
                let outcome = self.exchange_refresh(&refresh_token).await;
                // Back to idle before anyone resumes, success or failure.
                let waiters = self.gate.settle();
                match outcome {
                    Ok(token) => {
                        self.store
                            .set(self.scope, CredentialKind::AccessToken, &token);
                        tracing::debug!(
                            scope = self.scope.as_str(),
                            waiters = waiters.len(),
                            "access token refreshed"
                        );
                        for waiter in waiters {
                            let _ = waiter.send(Some(token.clone()));
                        }
                        Some(token)
                    }
                    Err(error) => {
                        tracing::warn!(
                            scope = self.scope.as_str(),
                            %error,
                            "access token refresh failed"
                        );
                        for waiter in waiters {
                            let _ = waiter.send(None);
                        }
                        None
                    }
                }
            }
            RefreshTicket::Waiter(rx) => rx.await.ok().flatten(),
        };

        // Exchange failed: every caller sees its own original 401.
        let Some(token) = renewed else {
            return Err(original);
        };

        // Exactly one replay per original request; this path cannot re-enter.
        self.send_attempt(plan, Some(&token)).await
    }

    async fn send_attempt(
        &self,
        plan: &RequestPlan,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .http
            .request(plan.method.clone(), &plan.url)
            .header("x-request-id", format!("req_{}", Uuid::new_v4().simple()))
            .timeout(self.timeout);
        if !plan.query.is_empty() {
            request = request.query(&plan.query);
        }
        if let Some(token) = bearer {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        if let Some(body) = plan.body.as_ref() {
            request = request.json(body);
        }
        request
            .send()
            .await
            .map_err(|error| ApiError::Transport(error.to_string()))
    }

    /// The one refresh exchange of a failure storm. Sent without a bearer;
    /// any error here (rejection or transport) counts as exchange failure.
    async fn exchange_refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let url = self
            .endpoint(TOKEN_REFRESH_PATH)
            .ok_or(ApiError::InvalidPath)?;
        let response = self
            .http
            .post(url)
            .header("x-request-id", format!("req_{}", Uuid::new_v4().simple()))
            .timeout(self.timeout)
            .json(&TokenRefreshRequest {
                refresh: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(|error| ApiError::Transport(error.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|error| ApiError::Transport(error.to_string()))?;
        if !status.is_success() {
            return Err(http_error(status, &bytes));
        }
        let parsed: TokenRefreshResponse =
            serde_json::from_slice(&bytes).map_err(|error| ApiError::Decode(error.to_string()))?;
        Ok(parsed.access)
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|error| ApiError::Decode(error.to_string()))
}

async fn decode_json_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|error| ApiError::Transport(error.to_string()))?;
    if !status.is_success() {
        return Err(http_error(status, &bytes));
    }
    serde_json::from_slice(&bytes).map_err(|error| ApiError::Decode(error.to_string()))
}

async fn discard_response(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = response.bytes().await.unwrap_or_default();
    Err(http_error(status, &bytes))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hemolink_client_core::{MemoryCredentialStore, SessionScope};

    use super::ApiClient;
    use crate::error::ApiError;

    fn client(base_url: &str) -> Result<ApiClient, ApiError> {
        ApiClient::new(
            base_url,
            SessionScope::User,
            Arc::new(MemoryCredentialStore::new()),
        )
    }

    #[test]
    fn endpoint_builder_normalizes_paths() {
        let client = client("https://api.hemolink.org/").expect("client");
        assert_eq!(
            client.endpoint("/api/donors/"),
            Some("https://api.hemolink.org/api/donors/".to_string())
        );
        assert_eq!(
            client.endpoint("api/donors/"),
            Some("https://api.hemolink.org/api/donors/".to_string())
        );
        assert_eq!(client.endpoint(""), None);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = client("   ");
        assert!(matches!(result, Err(ApiError::Input(_))));
    }
}
