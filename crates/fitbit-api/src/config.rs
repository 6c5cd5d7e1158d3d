//! Client configuration
//!
//! Defaults point at the production Fitbit API. Environment variables
//! override individual fields so the client can be aimed at a local mock
//! or a proxy without code changes.

use fitbit_auth::{API_ROOT, TOKEN_ENDPOINT};

use crate::error::{Error, Result};

/// Where to send requests and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Resource API root, no trailing slash
    pub api_root: String,
    /// Token endpoint used for refresh
    pub token_url: String,
    /// Per-request timeout applied by the HTTP client
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_root: API_ROOT.to_owned(),
            token_url: TOKEN_ENDPOINT.to_owned(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Point both the resource API and the token endpoint at one base URL.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            api_root: base.to_owned(),
            token_url: format!("{base}/oauth2/token"),
            timeout_secs: default_timeout(),
        }
    }

    /// Defaults overlaid with `FITBIT_API_ROOT`, `FITBIT_TOKEN_URL` and
    /// `FITBIT_TIMEOUT_SECS`, then validated.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("FITBIT_API_ROOT") {
            config.api_root = root;
        }
        if let Ok(url) = std::env::var("FITBIT_TOKEN_URL") {
            config.token_url = url;
        }
        if let Ok(secs) = std::env::var("FITBIT_TIMEOUT_SECS") {
            config.timeout_secs = secs.trim().parse().map_err(|e| {
                Error::Config(format!("FITBIT_TIMEOUT_SECS must be an integer: {e}"))
            })?;
        }

        config.validated()
    }

    /// Check URL schemes and timeout, and strip a trailing `/` from `api_root`.
    pub fn validated(mut self) -> Result<Self> {
        for (name, value) in [("api_root", &self.api_root), ("token_url", &self.token_url)] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(Error::Config(format!(
                    "{name} must start with http:// or https://, got: {value}"
                )));
            }
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        self.api_root = self.api_root.trim_end_matches('/').to_owned();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that mutate environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 3] = ["FITBIT_API_ROOT", "FITBIT_TOKEN_URL", "FITBIT_TIMEOUT_SECS"];

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn clear_env() {
        for key in VARS {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    fn test_defaults_point_at_fitbit() {
        let config = ApiConfig::default();
        assert_eq!(config.api_root, "https://api.fitbit.com");
        assert_eq!(config.token_url, "https://api.fitbit.com/oauth2/token");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_from_env_without_overrides_is_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { clear_env() };
        assert_eq!(ApiConfig::from_env().unwrap(), ApiConfig::default());
    }

    #[test]
    fn test_from_env_overrides() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            clear_env();
            set_env("FITBIT_API_ROOT", "http://127.0.0.1:9000/");
            set_env("FITBIT_TOKEN_URL", "http://127.0.0.1:9000/token");
            set_env("FITBIT_TIMEOUT_SECS", "5");
        }
        let config = ApiConfig::from_env().unwrap();
        unsafe { clear_env() };

        assert_eq!(config.api_root, "http://127.0.0.1:9000");
        assert_eq!(config.token_url, "http://127.0.0.1:9000/token");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_non_numeric_timeout_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            clear_env();
            set_env("FITBIT_TIMEOUT_SECS", "soon");
        }
        let result = ApiConfig::from_env();
        unsafe { clear_env() };
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        let config = ApiConfig {
            api_root: "api.fitbit.com".into(),
            ..ApiConfig::default()
        };
        let err = config.validated().unwrap_err().to_string();
        assert!(
            err.contains("api_root must start with http"),
            "error message should explain the issue, got: {err}"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ApiConfig {
            timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(config.validated().is_err(), "timeout_secs = 0 must be rejected");
    }

    #[test]
    fn test_with_base_url_derives_token_url() {
        let config = ApiConfig::with_base_url("http://localhost:1234/");
        assert_eq!(config.api_root, "http://localhost:1234");
        assert_eq!(config.token_url, "http://localhost:1234/oauth2/token");
    }
}
