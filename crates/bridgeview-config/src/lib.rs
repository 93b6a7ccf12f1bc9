//! Configuration for the bridgeview dashboard.
//!
//! TOML profiles layered with `BRIDGEVIEW_` environment variables, and
//! translation to `bridgeview_core::ClientConfig`. Command-line flags are
//! applied last through [`Overrides`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use bridgeview_core::ClientConfig;
use bridgeview_core::config::{
    DEFAULT_DOCS_OUTPUT_DIR, DEFAULT_LOG_PAGE_INCREMENT, DEFAULT_LOG_PAGE_SIZE,
};

pub const ENV_PREFIX: &str = "BRIDGEVIEW_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile { profile: String },

    #[error("no bridge server configured (use --server or a profile)")]
    NoServer,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named bridge profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds; 0 waits indefinitely.
    #[serde(default)]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_log_page_size")]
    pub log_page_size: usize,

    #[serde(default = "default_log_page_increment")]
    pub log_page_increment: usize,

    #[serde(default = "default_docs_output_dir")]
    pub docs_output_dir: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: 0,
            insecure: false,
            log_page_size: default_log_page_size(),
            log_page_increment: default_log_page_increment(),
            docs_output_dir: default_docs_output_dir(),
        }
    }
}

fn default_log_page_size() -> usize {
    DEFAULT_LOG_PAGE_SIZE
}
fn default_log_page_increment() -> usize {
    DEFAULT_LOG_PAGE_INCREMENT
}
fn default_docs_output_dir() -> String {
    DEFAULT_DOCS_OUTPUT_DIR.into()
}

/// A named bridge profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Bridge root URL (e.g., "http://homeassistant.local:8000").
    pub server: String,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,
}

/// Values from the command line; each one wins over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub profile: Option<String>,
    pub server: Option<String>,
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "bridgeview", "bridgeview").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("bridgeview");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the platform config file and environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the built-in defaults.
///
/// Nested keys use a double underscore, e.g. `BRIDGEVIEW_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Build the `ClientConfig` for one session.
///
/// An explicitly named profile must exist. The default profile may be
/// absent as long as `--server` supplies the address.
pub fn resolve(config: &Config, overrides: &Overrides) -> Result<ClientConfig, ConfigError> {
    let profile = match overrides.profile.as_deref() {
        Some(name) => Some(config.profiles.get(name).ok_or_else(|| {
            ConfigError::UnknownProfile {
                profile: name.into(),
            }
        })?),
        None => config
            .default_profile
            .as_deref()
            .and_then(|name| config.profiles.get(name)),
    };

    let server = overrides
        .server
        .as_deref()
        .or_else(|| profile.map(|p| p.server.as_str()))
        .ok_or(ConfigError::NoServer)?;
    let server = parse_server(server)?;

    let timeout_secs = overrides
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(config.defaults.timeout);

    let defaults = &config.defaults;
    for (field, value) in [
        ("log_page_size", defaults.log_page_size),
        ("log_page_increment", defaults.log_page_increment),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation {
                field: field.into(),
                reason: "must be at least 1".into(),
            });
        }
    }

    Ok(ClientConfig {
        server,
        timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        accept_invalid_certs: profile
            .and_then(|p| p.insecure)
            .unwrap_or(defaults.insecure),
        log_page_size: defaults.log_page_size,
        log_page_increment: defaults.log_page_increment,
        docs_output_dir: defaults.docs_output_dir.clone(),
    })
}

fn parse_server(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}
