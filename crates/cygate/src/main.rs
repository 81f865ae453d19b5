//! CyGate — entry point.
//!
//! Reads configuration from environment variables and starts the axum-based
//! gateway service.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CY_APIKEY` | *(required)* | Upstream API key injected into every outbound call. |
//! | `CY_BASE_URL` | `https://api.neople.co.kr/cy` | Upstream base URL. |
//! | `GATEWAY_PORT` | `3000` | TCP port to listen on. |
//! | `UPSTREAM_TIMEOUT_MS` | `10000` | Per-call upstream deadline. |

use cygate::config::GatewayConfig;
use cygate::server::GatewayServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cygate=info".parse().unwrap()),
        )
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!(
        port = config.port,
        base_url = %config.base_url,
        upstream_timeout_ms = config.upstream_timeout.as_millis() as u64,
        "CyGate configuration loaded"
    );

    if let Err(e) = GatewayServer::new(config).start().await {
        eprintln!("gateway error: {e}");
        std::process::exit(1);
    }
}
