// ── Runtime client configuration ──
//
// Describes *how* to talk to one bridge. Never touches disk: the TUI
// resolves profiles and flags through bridgeview-config and hands the
// result in.

use std::time::Duration;

use bridgeview_api::TransportConfig;
use url::Url;

pub const DEFAULT_LOG_PAGE_SIZE: usize = 100;
pub const DEFAULT_LOG_PAGE_INCREMENT: usize = 100;
pub const DEFAULT_DOCS_OUTPUT_DIR: &str = "docs/generated";

/// Configuration for one bridge session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bridge root URL (e.g. `http://homeassistant.local:8000`).
    pub server: Url,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub accept_invalid_certs: bool,
    /// Log rows requested after a filter change.
    pub log_page_size: usize,
    /// Rows added by each "load more".
    pub log_page_increment: usize,
    /// Target directory sent with documentation regeneration.
    pub docs_output_dir: String,
}

impl ClientConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            timeout: None,
            accept_invalid_certs: false,
            log_page_size: DEFAULT_LOG_PAGE_SIZE,
            log_page_increment: DEFAULT_LOG_PAGE_INCREMENT,
            docs_output_dir: DEFAULT_DOCS_OUTPUT_DIR.to_owned(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}
