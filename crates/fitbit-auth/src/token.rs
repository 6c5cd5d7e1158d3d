//! OAuth token exchange and refresh
//!
//! Handles the two token endpoint interactions:
//! 1. Authorization code exchange (completes the PKCE flow)
//! 2. Token refresh (triggered by an `expired_token` 401 on a resource call)
//!
//! Both POST a form to the token endpoint, authenticated with HTTP Basic
//! `client_id:client_secret`. Fitbit rotates the refresh token on every
//! refresh, so the returned pair always replaces the stored one wholesale.

use std::fmt;

use serde::Deserialize;
use tracing::{info, warn};

use crate::credentials::ClientCredentials;
use crate::error::{Error, Result};
use crate::secret::Secret;

/// The current access/refresh token pair plus the resource owner's id.
///
/// Deserialized directly from the token endpoint response; extra fields
/// (`expires_in`, `scope`, `token_type`) are ignored since expiry is
/// discovered lazily from 401 responses.
#[derive(Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
    pub user_id: String,
}

impl TokenPair {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            refresh_token: Secret::new(refresh_token.into()),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &self.access_token)
            .field("refresh_token", &self.refresh_token)
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Exchange an authorization code for tokens (initial OAuth flow).
///
/// The user has consented in their browser and we hold the code from the
/// redirect. The PKCE verifier proves we are the party that started the flow.
pub async fn exchange_code(
    client: &reqwest::Client,
    token_url: &str,
    credentials: &ClientCredentials,
    code: &str,
    verifier: &str,
) -> Result<TokenPair> {
    let tokens = post_token_form(
        client,
        token_url,
        credentials,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("grant_type", "authorization_code"),
        ],
    )
    .await?;
    info!(user_id = %tokens.user_id, "authorization code exchanged for tokens");
    Ok(tokens)
}

/// Trade a refresh token for a brand-new token pair.
///
/// Only called reactively after an `expired_token` 401. The old refresh
/// token is dead once this succeeds, so the caller must persist the result
/// before doing anything else.
pub async fn refresh_tokens(
    client: &reqwest::Client,
    token_url: &str,
    credentials: &ClientCredentials,
    refresh_token: &str,
) -> Result<TokenPair> {
    let tokens = post_token_form(
        client,
        token_url,
        credentials,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ],
    )
    .await?;
    info!(user_id = %tokens.user_id, "token pair refreshed");
    Ok(tokens)
}

async fn post_token_form(
    client: &reqwest::Client,
    token_url: &str,
    credentials: &ClientCredentials,
    form: &[(&str, &str)],
) -> Result<TokenPair> {
    let response = client
        .post(token_url)
        .basic_auth(
            &credentials.client_id,
            Some(credentials.client_secret.expose()),
        )
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        warn!(status = status.as_u16(), body = %body, "token endpoint rejected request");
        return Err(Error::TokenExchange {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<TokenPair>()
        .await
        .map_err(|e| Error::TokenResponse(e.to_string()))
}
