//! PKCE (Proof Key for Code Exchange) implementation per RFC 7636
//!
//! Generates the code verifier and S256 challenge used during the Fitbit
//! authorization flow, builds the browser-facing authorization URL, and
//! pulls the authorization code back out of the redirect URL the user lands
//! on after consenting.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};

use crate::constants::{AUTHORIZE_ENDPOINT, CODE_CHALLENGE_METHOD, RESPONSE_TYPE};
use crate::error::{Error, Result};

/// Smallest entropy that still encodes to the RFC 7636 minimum of 43 chars.
pub const MIN_VERIFIER_ENTROPY: usize = 32;

/// Largest entropy that still encodes to the RFC 7636 maximum of 128 chars.
pub const MAX_VERIFIER_ENTROPY: usize = 96;

/// Generate a cryptographically random PKCE code verifier.
///
/// Draws `entropy_bytes` bytes from the thread-local CSPRNG and encodes them
/// as URL-safe base64 without padding. The encoded length is
/// `ceil(entropy_bytes * 4 / 3)`, so only 32..=96 bytes keep the verifier
/// inside the 43..=128 character window.
pub fn generate_code_verifier(entropy_bytes: usize) -> Result<String> {
    if !(MIN_VERIFIER_ENTROPY..=MAX_VERIFIER_ENTROPY).contains(&entropy_bytes) {
        return Err(Error::Validation(format!(
            "verifier entropy must be {MIN_VERIFIER_ENTROPY}..={MAX_VERIFIER_ENTROPY} bytes, got {entropy_bytes}"
        )));
    }
    let mut bytes = vec![0u8; entropy_bytes];
    rand::rng().fill(bytes.as_mut_slice());
    Ok(URL_SAFE_NO_PAD.encode(&bytes))
}

/// Compute the S256 code challenge from a verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Parameters of the authorization request sent through the user's browser.
///
/// `method` and `response_type` default to `S256` / `code`. Overrides are
/// passed through unvalidated; Fitbit rejects anything else itself.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest<'a> {
    pub client_id: &'a str,
    /// Space-separated capability list, inserted into the URL verbatim.
    pub scope: &'a str,
    pub challenge: &'a str,
    pub method: &'a str,
    pub response_type: &'a str,
}

impl<'a> AuthorizationRequest<'a> {
    pub fn new(client_id: &'a str, scope: &'a str, challenge: &'a str) -> Self {
        Self {
            client_id,
            scope,
            challenge,
            method: CODE_CHALLENGE_METHOD,
            response_type: RESPONSE_TYPE,
        }
    }

    /// Format the GET-able authorization URL against `authorize_endpoint`.
    pub fn url(&self, authorize_endpoint: &str) -> String {
        format!(
            "{}?client_id={}&response_type={}&code_challenge={}&code_challenge_method={}&scope={}",
            authorize_endpoint,
            self.client_id,
            self.response_type,
            self.challenge,
            self.method,
            self.scope,
        )
    }
}

/// Build the Fitbit authorization URL with the default method and response type.
///
/// Whether `scope` is escaped is up to the caller; see [`encode_scope`].
/// Opening the URL in a browser is also left to the caller.
pub fn build_authorization_url(client_id: &str, scope: &str, challenge: &str) -> String {
    AuthorizationRequest::new(client_id, scope, challenge).url(AUTHORIZE_ENDPOINT)
}

/// Percent-encode the separators in a scope list.
///
/// Fitbit scope names are plain lowercase words, so only the characters
/// that would break query parsing need escaping.
pub fn encode_scope(scope: &str) -> String {
    scope
        .replace('%', "%25")
        .replace(' ', "%20")
        .replace('&', "%26")
        .replace('#', "%23")
}

/// Pull the authorization code out of the redirect URL.
///
/// Fitbit appends a `#_=_` fragment to the redirect; the code is the
/// `code` query parameter before it.
pub fn extract_authorization_code(redirect_url: &str) -> Result<String> {
    let url = url::Url::parse(redirect_url.trim())
        .map_err(|e| Error::Validation(format!("redirect URL is not a URL: {e}")))?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| Error::Validation("redirect URL has no authorization code".into()))
}
