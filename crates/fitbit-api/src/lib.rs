//! Fitbit Web API client
//!
//! Typed accessors over the heart-rate endpoints, backed by a request layer
//! that recovers from access-token expiry by refreshing through
//! `fitbit-auth` and retrying once. The credential store is injected; this
//! crate never reads ambient token state.
//!
//! Request flow:
//! 1. Accessor validates its parameters (`validate`) and builds the path
//! 2. `ApiClient` loads the current `TokenPair` from the store
//! 3. GET with the bearer token
//! 4. `expired_token` 401 → refresh, save the new pair, retry once
//! 5. Non-2xx → `Error::ApiRequest`; 2xx → JSON returned as-is

pub mod client;
pub mod config;
pub mod error;
pub mod heart_rate;
pub mod validate;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use heart_rate::HeartRate;
