// Shared transport configuration for building the reqwest::Client.
//
// Keeps timeout and TLS knobs in one place so the client constructor and
// tests build identical HTTP stacks.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Per-request timeout. `None` lets a hung request wait forever, which
    /// leaves the owning panel in its loading state.
    pub timeout: Option<Duration>,
    /// Accept self-signed certificates (bridge behind a home reverse proxy).
    pub accept_invalid_certs: bool,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("bridgeview/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder.build()?)
    }
}
