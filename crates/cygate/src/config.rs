//! Environment-backed runtime configuration.
//!
//! The upstream credential is read exactly once at startup and injected into
//! the server at construction; nothing else in the process touches the
//! environment.  A missing credential is the only startup-fatal condition.

use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.neople.co.kr/cy";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CY_APIKEY is not set — the gateway cannot authenticate against the upstream")]
    MissingApiKey,

    #[error("CY_BASE_URL is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Runtime configuration for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Upstream base URL, e.g. `https://api.neople.co.kr/cy`.
    pub base_url: Url,
    /// Upstream credential, appended to every outbound URL.  Never logged,
    /// never echoed to callers.
    pub api_key: String,
    /// Per-call upstream deadline.
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    /// Read configuration from the environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CY_APIKEY` | *(required)* |
    /// | `CY_BASE_URL` | `https://api.neople.co.kr/cy` |
    /// | `GATEWAY_PORT` | `3000` |
    /// | `UPSTREAM_TIMEOUT_MS` | `10000` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("CY_APIKEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = match std::env::var("CY_BASE_URL") {
            Ok(raw) => Url::parse(&raw)?,
            Err(_) => Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        };

        let port = std::env::var("GATEWAY_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let upstream_timeout = std::env::var("UPSTREAM_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT);

        Ok(Self {
            port,
            base_url,
            api_key,
            upstream_timeout,
        })
    }
}
