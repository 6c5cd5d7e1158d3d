//! Fitbit OAuth constants
//!
//! Endpoint locations for the Fitbit Web API authorization flow. The client
//! id and secret are per-application and live in the secrets record, not
//! here.

/// Browser-facing authorization endpoint (user consent page)
pub const AUTHORIZE_ENDPOINT: &str = "https://www.fitbit.com/oauth2/authorize";

/// Token endpoint for code exchange and token refresh
pub const TOKEN_ENDPOINT: &str = "https://api.fitbit.com/oauth2/token";

/// Root of the resource API (`/1/user/...` paths hang off this)
pub const API_ROOT: &str = "https://api.fitbit.com";

/// The only PKCE challenge method Fitbit supports.
pub const CODE_CHALLENGE_METHOD: &str = "S256";

/// Authorization-code flow response type.
pub const RESPONSE_TYPE: &str = "code";

/// Default number of random bytes behind a code verifier (86 chars encoded).
pub const DEFAULT_VERIFIER_ENTROPY: usize = 64;
