use thiserror::Error;

/// Top-level error type for the `bridgeview-api` crate.
///
/// Every call against the bridge API ends in exactly one of these outcomes
/// when it does not succeed. `bridgeview-core` maps them into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured server URL cannot carry path segments (e.g. `mailto:`).
    #[error("Server URL cannot be used as an API base: {0}")]
    InvalidBaseUrl(String),

    /// Non-2xx response whose body is not a `{success, data, error}` envelope.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Envelope ────────────────────────────────────────────────────
    /// The server answered `{"success": false, "error": "..."}`.
    ///
    /// `message` is the server-provided string, untouched.
    #[error("API error: {message}")]
    Api { message: String },

    /// The server answered `{"success": true}` without the `data` the
    /// endpoint promises.
    #[error("Response from {endpoint} carried no data")]
    MissingData { endpoint: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never produced a usable HTTP exchange.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The server-provided error message, when the failure was reported
    /// through the envelope.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message } => Some(message),
            _ => None,
        }
    }
}
