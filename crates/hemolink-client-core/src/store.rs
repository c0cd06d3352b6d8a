//! Credential storage.
//!
//! The browser build kept tokens in `localStorage`; here the same contract is
//! an injected trait so a front end can back it with an in-memory map (tests)
//! or a JSON file that survives process restarts (the CLI).
//!
//! Reads and writes are deliberately infallible at the trait boundary: a
//! storage failure degrades to "no credential stored" rather than failing the
//! request that asked for it.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::session::{CredentialKind, SessionScope, storage_key};

/// Process-wide key/value store for session credentials.
pub trait CredentialStore: fmt::Debug + Send + Sync {
    /// Read a credential. Absent or unreadable entries are `None`.
    fn get(&self, scope: SessionScope, kind: CredentialKind) -> Option<String>;

    /// Overwrite a credential.
    fn set(&self, scope: SessionScope, kind: CredentialKind, value: &str);

    /// Drop every credential held for the scope.
    fn clear(&self, scope: SessionScope);

    /// Record a freshly established session: both tokens plus the active
    /// marker, in one call.
    fn store_session(&self, scope: SessionScope, access: &str, refresh: &str) {
        self.set(scope, CredentialKind::AccessToken, access);
        self.set(scope, CredentialKind::RefreshToken, refresh);
        self.set(scope, CredentialKind::SessionActive, "true");
    }

    fn session_active(&self, scope: SessionScope) -> bool {
        self.get(scope, CredentialKind::SessionActive)
            .is_some_and(|value| value == "true")
    }
}

/// In-memory credential store. The default for tests and short-lived tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, scope: SessionScope, kind: CredentialKind) -> Option<String> {
        let lock = self.entries.read().ok()?;
        lock.get(&storage_key(scope, kind)).cloned()
    }

    fn set(&self, scope: SessionScope, kind: CredentialKind, value: &str) {
        if let Ok(mut lock) = self.entries.write() {
            lock.insert(storage_key(scope, kind), value.to_string());
        }
    }

    fn clear(&self, scope: SessionScope) {
        let prefix = format!("{}.", scope.as_str());
        if let Ok(mut lock) = self.entries.write() {
            lock.retain(|key, _| !key.starts_with(&prefix));
        }
    }
}

/// Credential store backed by a single JSON document on disk.
///
/// Every read loads the file and every write rewrites it, which keeps the
/// store coherent across processes at the cost of a small amount of I/O.
/// Token traffic is rare enough that this never matters.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        let Ok(bytes) = fs::read(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                tracing::warn!(path = %self.path.display(), %error, "credential dir create failed");
                return;
            }
        }
        match serde_json::to_vec_pretty(entries) {
            Ok(bytes) => {
                if let Err(error) = fs::write(&self.path, bytes) {
                    tracing::warn!(path = %self.path.display(), %error, "credential write failed");
                }
            }
            Err(error) => {
                tracing::warn!(%error, "credential encode failed");
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, scope: SessionScope, kind: CredentialKind) -> Option<String> {
        self.load().get(&storage_key(scope, kind)).cloned()
    }

    fn set(&self, scope: SessionScope, kind: CredentialKind, value: &str) {
        let mut entries = self.load();
        entries.insert(storage_key(scope, kind), value.to_string());
        self.persist(&entries);
    }

    fn clear(&self, scope: SessionScope) {
        let prefix = format!("{}.", scope.as_str());
        let mut entries = self.load();
        entries.retain(|key, _| !key.starts_with(&prefix));
        self.persist(&entries);
    }
}
