//! Authenticated HTTP client for the Hemolink blood-donation platform.
//!
//! The interesting part lives in [`http`] and [`refresh`]: transparent
//! access-token renewal with single-flight coordination, so N requests that
//! fail with 401 inside one failure storm cost exactly one refresh exchange
//! and one replay each. [`client`] layers the typed endpoint surface on top.

pub mod client;
pub mod error;
pub mod http;
pub mod refresh;
pub mod types;

pub use client::{AdminClient, DonorSearchFilter, HemolinkClient};
pub use error::ApiError;
pub use http::{ApiClient, DEFAULT_TIMEOUT_MS, TOKEN_REFRESH_PATH};
pub use refresh::{RefreshGate, RefreshTicket};
