//! `cygate` — validating HTTP proxy for the Neople Cyphers REST API.
//!
//! The gateway exposes a typed `/cy/...` surface, validates and normalizes
//! every parameter against the declarative catalog in [`endpoints`], builds
//! the upstream URL with the server-side `apikey` appended last, issues a
//! single non-retried GET, and relays the JSON answer — status and body —
//! verbatim.  Validation failures are rejected with the complete violation
//! list before any upstream traffic.
//!
//! The generic engine (parameter specs, validator, URL builder) lives in
//! [`cygate_core`]; this crate holds the catalog, the axum service, the
//! upstream client, and the binary entry point.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use cygate::config::GatewayConfig;
//! use cygate::server::GatewayServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GatewayConfig::from_env().expect("CY_APIKEY must be set");
//!     GatewayServer::new(config).start().await.unwrap();
//! }
//! ```

pub mod config;
pub mod endpoints;
pub mod error;
pub mod server;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use server::GatewayServer;
