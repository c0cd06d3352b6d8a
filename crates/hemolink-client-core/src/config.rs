//! Backend base-URL resolution.
//!
//! Mirrors the old runtime-injected chain: explicit env override first, then
//! the local development backend. Front ends may also pass a configured value
//! through [`normalize_base_url`] directly.

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ENV_API_BASE_URL: &str = "HEMOLINK_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientInputError {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
    #[error("login identifier must not be empty")]
    EmptyIdentifier,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("unknown blood group: {0}")]
    UnknownBloodGroup(String),
    #[error("last donation must be within the last three months and not in the future")]
    DonationDateOutOfWindow,
}

/// Resolve the backend base URL from the environment, falling back to the
/// local development backend. Returns the URL and the source it came from.
pub fn resolve_api_base_url() -> Result<(String, &'static str), ClientInputError> {
    if let Some(base_url) = env_non_empty(ENV_API_BASE_URL) {
        return normalize_base_url(&base_url).map(|normalized| (normalized, ENV_API_BASE_URL));
    }
    normalize_base_url(DEFAULT_API_BASE_URL).map(|normalized| (normalized, "default_local"))
}

/// Trim and validate a base URL: scheme plus host, no trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ClientInputError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientInputError::EmptyBaseUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientInputError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ClientInputError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ClientInputError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
}
