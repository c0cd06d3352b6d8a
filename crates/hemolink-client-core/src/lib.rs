//! Shared client core for Hemolink sessions.
//!
//! Holds the pieces every Hemolink front end needs before it can talk to the
//! backend: session scopes, the credential store abstraction, base-URL
//! resolution, and the input normalization the forms used to do by hand.

pub mod config;
pub mod identity;
pub mod session;
pub mod store;

pub use config::{
    ClientInputError, DEFAULT_API_BASE_URL, ENV_API_BASE_URL, normalize_base_url,
    resolve_api_base_url,
};
pub use identity::{BloodGroup, LoginIdentifier, normalize_email, validate_last_donation};
pub use session::{CredentialKind, SessionScope};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
