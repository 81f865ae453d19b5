//! Upstream HTTP client.
//!
//! [`UpstreamClient`] wraps a single `reqwest::Client` built once at startup
//! with the configured per-call deadline.  Every gateway call maps to exactly
//! one non-retried GET; whatever status the upstream answers with — 2xx or
//! not — is an `Ok` and is relayed verbatim.  Only transport-level failures
//! become errors.

use crate::error::{GatewayError, GatewayResult};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Opaque upstream payload: status plus body, untyped by this system.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Issues the single outbound GET for each gateway call.
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Build the client with a fixed per-call timeout.
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch `url` and return whatever the upstream answered.
    ///
    /// The URL carries the credential, so logging here records the path
    /// only, never the query string.
    pub async fn fetch(&self, url: Url) -> GatewayResult<UpstreamResponse> {
        let path = url.path().to_string();
        let started = std::time::Instant::now();

        let response = self.client.get(url).send().await.map_err(map_transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(map_transport)?.to_vec();

        debug!(
            path = %path,
            status,
            bytes = body.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "upstream answered"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Map a reqwest transport error onto the gateway taxonomy.
///
/// `without_url()` strips the request URL from the error before it is
/// rendered — the URL contains the credential.
fn map_transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::UpstreamTimeout
    } else {
        GatewayError::UpstreamUnreachable(err.without_url().to_string())
    }
}
