//! Error types for resource API operations

/// Errors from Fitbit resource calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed caller-supplied parameter; nothing was sent over the wire.
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// Non-2xx from a resource endpoint after the single refresh-retry.
    #[error("API request failed with {status}: {body}")]
    ApiRequest { status: u16, body: String },

    /// Token refresh or credential store failure.
    #[error("authentication error: {0}")]
    Auth(#[from] fitbit_auth::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx response whose body is not JSON.
    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;
