//! Session scopes and credential kinds.
//!
//! The platform keeps two independent sessions side by side: the ordinary
//! user session and the admin console session. Credentials are namespaced by
//! scope so a failed admin refresh can never clobber user tokens.

use serde::{Deserialize, Serialize};

/// Which session a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionScope {
    User,
    Admin,
}

impl SessionScope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// The pieces of state persisted per scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// Short-lived bearer token attached to requests.
    AccessToken,
    /// Long-lived token presented to the refresh endpoint.
    RefreshToken,
    /// Marker recording that a session was established for the scope.
    SessionActive,
}

impl CredentialKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access",
            Self::RefreshToken => "refresh",
            Self::SessionActive => "active",
        }
    }
}

/// Storage key for a scope/kind pair, e.g. `user.access` or `admin.refresh`.
#[must_use]
pub fn storage_key(scope: SessionScope, kind: CredentialKind) -> String {
    format!("{}.{}", scope.as_str(), kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::{CredentialKind, SessionScope, storage_key};

    #[test]
    fn storage_keys_are_namespaced_by_scope() {
        assert_eq!(
            storage_key(SessionScope::User, CredentialKind::AccessToken),
            "user.access"
        );
        assert_eq!(
            storage_key(SessionScope::Admin, CredentialKind::RefreshToken),
            "admin.refresh"
        );
        assert_eq!(
            storage_key(SessionScope::Admin, CredentialKind::SessionActive),
            "admin.active"
        );
    }
}
