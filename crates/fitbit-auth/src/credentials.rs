//! Credential storage for the Fitbit OAuth flow
//!
//! `CredentialStore` is the slot the request layer reads the current token
//! pair from and writes refreshed pairs back to. `SecretsFile` is the one
//! backend: a TOML key-value record holding the registered app identity and
//! the tokens. All writes use atomic temp-file + rename so a crash never
//! leaves half a token pair on disk, and a tokio Mutex serializes writers.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::secret::Secret;
use crate::token::TokenPair;

/// Registered application identity. Read-only once parsed.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
        }
    }
}

/// Atomically-replaceable slot holding the current token pair.
///
/// `save` must fully replace the previous pair before any later `load` can
/// observe it. Uses `Pin<Box<dyn Future>>` return types so the store can be
/// shared as `Arc<dyn CredentialStore>`.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<TokenPair>> + Send + '_>>;

    fn save(&self, tokens: TokenPair) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// On-disk shape of the secrets file.
///
/// No `Debug`: every field but `user_id` is sensitive.
#[derive(Clone, Default, Serialize, Deserialize)]
struct SecretsRecord {
    client_id: String,
    client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

impl SecretsRecord {
    fn token_pair(&self) -> Result<TokenPair> {
        match (&self.access_token, &self.refresh_token, &self.user_id) {
            (Some(access), Some(refresh), Some(user_id)) => {
                Ok(TokenPair::new(access.as_str(), refresh.as_str(), user_id.as_str()))
            }
            _ => Err(Error::NotAuthorized(
                "secrets record has no token pair; run the authorization flow first".into(),
            )),
        }
    }

    fn set_token_pair(&mut self, tokens: &TokenPair) {
        self.access_token = Some(tokens.access_token.expose().clone());
        self.refresh_token = Some(tokens.refresh_token.expose().clone());
        self.user_id = Some(tokens.user_id.clone());
    }
}

/// TOML secrets file manager.
///
/// The client credentials are validated once at `open` and cached; the
/// token fields live behind the Mutex and are rewritten as a unit.
pub struct SecretsFile {
    path: PathBuf,
    credentials: ClientCredentials,
    state: Mutex<SecretsRecord>,
}

impl SecretsFile {
    /// Load and validate the secrets record at `path`.
    ///
    /// The file must exist and carry a non-empty `client_id` and
    /// `client_secret`; token fields may be absent before authorization.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::Io(format!("reading secrets file {}: {e}", path.display())))?;
        let record: SecretsRecord = toml::from_str(&contents)
            .map_err(|e| Error::CredentialParse(format!("parsing secrets file: {e}")))?;

        if record.client_id.trim().is_empty() {
            return Err(Error::CredentialParse("client_id must not be empty".into()));
        }
        if record.client_secret.trim().is_empty() {
            return Err(Error::CredentialParse(
                "client_secret must not be empty".into(),
            ));
        }

        let credentials = ClientCredentials::new(record.client_id.trim(), record.client_secret.trim());
        info!(
            path = %path.display(),
            authorized = record.token_pair().is_ok(),
            "loaded secrets"
        );

        Ok(Self {
            path,
            credentials,
            state: Mutex::new(record),
        })
    }

    pub fn client_credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Whether a full token pair is on record.
    pub async fn is_authorized(&self) -> bool {
        self.state.lock().await.token_pair().is_ok()
    }

    /// Persist the authorization code received from the redirect.
    pub async fn record_auth_code(&self, code: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.auth_code = Some(code.to_owned());
        write_atomic(&self.path, &next).await?;
        *state = next;
        debug!("recorded authorization code");
        Ok(())
    }
}

impl CredentialStore for SecretsFile {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<TokenPair>> + Send + '_>> {
        Box::pin(async move { self.state.lock().await.token_pair() })
    }

    /// Replace the token pair on disk first, then in memory.
    ///
    /// Holding the lock across both means readers see either the old pair or
    /// the new one, and a failed write leaves the old pair current.
    fn save(&self, tokens: TokenPair) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let mut next = state.clone();
            next.set_token_pair(&tokens);
            write_atomic(&self.path, &next).await?;
            *state = next;
            info!(user_id = %tokens.user_id, "saved token pair");
            Ok(())
        })
    }
}

/// Write the secrets record to a file atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. Permissions are 0600 on unix since the file holds tokens.
async fn write_atomic(path: &Path, record: &SecretsRecord) -> Result<()> {
    let contents = toml::to_string(record)
        .map_err(|e| Error::CredentialParse(format!("serializing secrets: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("secrets path has no parent directory".into()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("secrets.toml");

    let tmp_path = dir.join(format!(".{file_name}.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, contents.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp secrets file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting secrets file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp secrets file: {e}")))?;

    debug!(path = %path.display(), "persisted secrets");
    Ok(())
}
