//! Client configuration.
//!
//! ## Environment Variables
//! - `WEBAUTHN_BASE_URL`: relying party base URL (default: `http://127.0.0.1:8080`)
//! - `WEBAUTHN_REGISTER_URL`: registration endpoint (default: `<base>/register`)
//! - `WEBAUTHN_LOGIN_URL`: login endpoint (default: `<base>/login`)
//! - `WEBAUTHN_TIMEOUT_SECS`: per-request timeout in seconds (default: 30)
//! - `WEBAUTHN_USER_AGENT`: `User-Agent` sent with both requests

use std::{env, num::ParseIntError, time::Duration};
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} is not a valid URL ({value:?}): {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{name} is not a number of seconds ({value:?}): {source}")]
    InvalidTimeout {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Where the ceremonies are run and how requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint serving both round-trips of the registration ceremony
    pub register_url: Url,
    /// Endpoint serving both round-trips of the login ceremony
    pub login_url: Url,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration with `<base_url>/register` and `<base_url>/login` as
    /// endpoints and default request settings.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base = parse_url("base URL", base_url)?;
        Ok(Self {
            register_url: endpoint(&base, "register")?,
            login_url: endpoint(&base, "login")?,
            request_timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Load the configuration from the environment, reading a `.env` file
    /// first if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("WEBAUTHN_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(value) = lookup("WEBAUTHN_REGISTER_URL") {
            config.register_url = parse_url("WEBAUTHN_REGISTER_URL", &value)?;
        }
        if let Some(value) = lookup("WEBAUTHN_LOGIN_URL") {
            config.login_url = parse_url("WEBAUTHN_LOGIN_URL", &value)?;
        }
        if let Some(value) = lookup("WEBAUTHN_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidTimeout {
                    name: "WEBAUTHN_TIMEOUT_SECS",
                    value: value.clone(),
                    source,
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("WEBAUTHN_USER_AGENT") {
            config.user_agent = value;
        }

        Ok(config)
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        source,
    })
}

// `Url::join` replaces the last path segment unless the base ends with '/'.
fn endpoint(base: &Url, name: &str) -> Result<Url, ConfigError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(name).map_err(|source| ConfigError::InvalidUrl {
        name: "base URL",
        value: base.to_string(),
        source,
    })
}
