//! Fitbit OAuth2 PKCE authentication library
//!
//! Provides PKCE verifier/challenge generation, the authorization URL,
//! token exchange/refresh, and the secrets-file credential store.
//!
//! Credential flow:
//! 1. Caller runs `pkce::generate_code_verifier()` + `pkce::generate_code_challenge()`
//! 2. User consents via `pkce::build_authorization_url()` in a browser
//! 3. `pkce::extract_authorization_code()` pulls the code out of the redirect
//! 4. `token::exchange_code()` trades code + verifier for a `TokenPair`
//! 5. Pair stored via `CredentialStore::save()` on a `SecretsFile`
//! 6. On an `expired_token` 401 the request layer calls `token::refresh_tokens()`
//!    and saves the replacement pair

pub mod constants;
pub mod credentials;
pub mod error;
pub mod pkce;
pub mod secret;
pub mod token;

pub use constants::*;
pub use credentials::{ClientCredentials, CredentialStore, SecretsFile};
pub use error::{Error, Result};
pub use pkce::{
    AuthorizationRequest, build_authorization_url, encode_scope, extract_authorization_code,
    generate_code_challenge, generate_code_verifier,
};
pub use secret::Secret;
pub use token::{TokenPair, exchange_code, refresh_tokens};
