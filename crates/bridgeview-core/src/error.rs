// ── Core error types ──
//
// User-facing errors from bridgeview-core. Consumers never match on HTTP
// details or JSON parse failures directly; the `From<bridgeview_api::Error>`
// impl folds transport-layer errors into these variants.

use thiserror::Error;

/// Prefix shown in front of every failure notice.
pub const FAILURE_PREFIX: &str = "Fehler: ";

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach bridge: {reason}")]
    Unreachable { reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Server verdicts ──────────────────────────────────────────────
    /// `success: false`; `message` is the server text, untouched.
    #[error("{message}")]
    Rejected { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    // ── Client-side errors ───────────────────────────────────────────
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The text to show a user. Server rejections are passed through as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// `Fehler: <message>`, the form every failure notice takes.
    pub fn notice_text(&self) -> String {
        format!("{FAILURE_PREFIX}{}", self.user_message())
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bridgeview_api::Error> for CoreError {
    fn from(err: bridgeview_api::Error) -> Self {
        match err {
            bridgeview_api::Error::Transport(e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::Unreachable {
                        reason: e.to_string(),
                    }
                }
            }
            bridgeview_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            bridgeview_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Server URL cannot be used as an API base: {url}"),
            },
            bridgeview_api::Error::Http { status, message } => CoreError::Http { status, message },
            bridgeview_api::Error::Api { message } => CoreError::Rejected { message },
            bridgeview_api::Error::MissingData { endpoint } => CoreError::InvalidResponse {
                message: format!("{endpoint} returned no data"),
            },
            bridgeview_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
