//! Authenticated request execution
//!
//! Every resource call goes through `ApiClient::authenticated_get`. The
//! client never tracks access-token expiry itself: Fitbit answers an expired
//! token with a 401 whose first error has `errorType = "expired_token"`.
//! That one case triggers a refresh, a save of the new pair, and exactly one
//! retry. Every other failure is terminal.
//!
//! Refresh is not single-flight. Callers sharing one store across
//! concurrent requests must serialize the refresh-then-retry themselves.

use std::sync::Arc;
use std::time::Duration;

use fitbit_auth::{ClientCredentials, CredentialStore, TokenPair};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// `errorType` Fitbit reports for an expired access token.
const EXPIRED_TOKEN: &str = "expired_token";

/// Fitbit Web API client bound to one credential store.
pub struct ApiClient<S: ?Sized> {
    http: reqwest::Client,
    config: ApiConfig,
    credentials: ClientCredentials,
    store: Arc<S>,
}

impl<S: CredentialStore + ?Sized> ApiClient<S> {
    pub fn new(config: ApiConfig, credentials: ClientCredentials, store: Arc<S>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            credentials,
            store,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// GET `url` with the pair's access token, recovering once from expiry.
    ///
    /// After a refresh the new pair is saved to the store before the retry,
    /// so `tokens` is stale from then on and callers should reload.
    pub async fn authenticated_get(&self, url: &str, tokens: &TokenPair) -> Result<Value> {
        let (mut status, mut body) = self.get(url, tokens.access_token.expose()).await?;

        if status == StatusCode::UNAUTHORIZED && is_expired_token(&body) {
            info!(url, "access token expired, refreshing");
            let refreshed = fitbit_auth::refresh_tokens(
                &self.http,
                &self.config.token_url,
                &self.credentials,
                tokens.refresh_token.expose(),
            )
            .await?;
            let access = refreshed.access_token.clone();
            self.store.save(refreshed).await?;

            (status, body) = self.get(url, access.expose()).await?;
        }

        if !status.is_success() {
            error!(url, status = status.as_u16(), body = %body, "API request failed");
            return Err(Error::ApiRequest {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(format!("{url} returned non-JSON body: {e}")))
    }

    /// GET `/1/user/{user_id}/{resource}` using the store's current pair.
    pub async fn get_user_resource(&self, resource: &str) -> Result<Value> {
        let tokens = self.store.load().await?;
        let url = format!(
            "{}/1/user/{}/{}",
            self.config.api_root, tokens.user_id, resource
        );
        self.authenticated_get(&url, &tokens).await
    }

    async fn get(&self, url: &str, access_token: &str) -> Result<(StatusCode, String)> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Whether a 401 body reports `errors[0].errorType == "expired_token"`.
fn is_expired_token(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/errors/0/errorType")
                .and_then(Value::as_str)
                .map(|t| t == EXPIRED_TOKEN)
        })
        .unwrap_or(false)
}
