//! Error types for OAuth authentication operations

/// Errors from OAuth authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (DNS, connect, TLS). The source is kept intact.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint answered with a non-2xx status.
    #[error("token endpoint returned {status}: {body}")]
    TokenExchange { status: u16, body: String },

    /// Token endpoint answered 2xx but the body was not a token pair.
    #[error("invalid token response: {0}")]
    TokenResponse(String),

    #[error("invalid parameter: {0}")]
    Validation(String),

    #[error("secrets record parse error: {0}")]
    CredentialParse(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// The secrets record has no tokens yet; the authorization flow must run first.
    #[error("not authorized: {0}")]
    NotAuthorized(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_exchange_display_carries_status_and_body() {
        let err = Error::TokenExchange {
            status: 400,
            body: r#"{"errors":[{"errorType":"invalid_grant"}]}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("400"), "got: {msg}");
        assert!(msg.contains("invalid_grant"), "got: {msg}");
    }

    #[test]
    fn error_debug_includes_variant_name() {
        let err = Error::NotAuthorized("no tokens".into());
        let debug = format!("{err:?}");
        assert!(
            debug.contains("NotAuthorized"),
            "Debug output must include variant name, got: {debug}"
        );
    }
}
