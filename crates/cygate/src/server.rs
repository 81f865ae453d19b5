//! Axum-based gateway server.
//!
//! [`GatewayServer`] wires the endpoint catalog, the validator, and the
//! upstream client into an axum service.  Handlers are deliberately thin:
//! one per endpoint, each fixing the endpoint identity at registration and
//! delegating to [`AppState::dispatch`], which runs the whole
//! validate → build URL → fetch → relay sequence.
//!
//! # Endpoints
//!
//! | Method | Path |
//! |--------|------|
//! | `GET` | `/health` |
//! | `GET` | `/cy/players` |
//! | `GET` | `/cy/players/{playerId}` |
//! | `GET` | `/cy/players/{playerId}/matches` |
//! | `GET` | `/cy/matches/{matchId}` |
//! | `GET` | `/cy/ranking/ratingpoint` |
//! | `GET` | `/cy/ranking/characters/{characterId}/{rankingType}` |
//! | `GET` | `/cy/ranking/tsj/{tsjType}` |
//! | `GET` | `/cy/battleitems` |
//! | `GET` | `/cy/battleitems/{itemId}` |
//! | `GET` | `/cy/multi/battleitems` |
//! | `GET` | `/cy/characters` |
//! | `GET` | `/cy/position-attributes/{attributeId}` |

use crate::config::GatewayConfig;
use crate::endpoints::catalog;
use crate::error::GatewayError;
use crate::upstream::{UpstreamClient, UpstreamResponse};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use cygate_core::{EndpointSpec, RawInput, build_url, validate};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Shared application state
// ─────────────────────────────────────────────────────────────────────────────

/// Shared state injected into every handler.  Everything here is immutable
/// after startup, so concurrent calls share it lock-free.
#[derive(Clone)]
pub struct AppState {
    endpoints: Arc<HashMap<&'static str, EndpointSpec>>,
    upstream: Arc<UpstreamClient>,
    base_url: Url,
    credential: Arc<str>,
}

impl AppState {
    /// Run one gateway call end to end.
    ///
    /// Validation failures never reach the upstream; upstream responses —
    /// success or failure status alike — are relayed verbatim.
    async fn dispatch(&self, endpoint: &'static str, raw: RawInput) -> Response {
        let request_id = Uuid::new_v4();

        let Some(spec) = self.endpoints.get(endpoint) else {
            return GatewayError::Internal(format!("unregistered endpoint '{endpoint}'"))
                .into_response();
        };

        let normalized = match validate(&raw, spec) {
            Ok(n) => n,
            Err(err) => {
                info!(
                    %request_id,
                    endpoint,
                    violations = err.violations.len(),
                    "rejected before any upstream call"
                );
                return GatewayError::BadRequest(err).into_response();
            }
        };

        let url = match build_url(&self.base_url, spec, &normalized, &self.credential) {
            Ok(url) => url,
            Err(err) => return GatewayError::Internal(err.to_string()).into_response(),
        };

        let started = std::time::Instant::now();
        match self.upstream.fetch(url).await {
            Ok(resp) => {
                info!(
                    %request_id,
                    endpoint,
                    status = resp.status,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "relayed upstream response"
                );
                relay(resp)
            }
            Err(err) => {
                warn!(%request_id, endpoint, error = %err, "upstream call failed");
                err.into_response()
            }
        }
    }
}

/// Relay an upstream payload unchanged: same status, same body.
fn relay(resp: UpstreamResponse) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = resp
        .content_type
        .unwrap_or_else(|| "application/json".to_string());
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(resp.body))
        .unwrap_or_else(|e| GatewayError::Internal(e.to_string()).into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewayServer
// ─────────────────────────────────────────────────────────────────────────────

/// High-level gateway server: catalog registration plus the axum app.
pub struct GatewayServer {
    config: GatewayConfig,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Build the axum [`Router`].
    ///
    /// Validates every catalog entry at registration; an invalid spec is a
    /// programming error and panics before the server binds.
    pub fn build_app(&self) -> Router {
        let mut endpoints = HashMap::new();
        for spec in catalog() {
            spec.validate().expect("invalid endpoint spec in catalog");
            endpoints.insert(spec.name, spec);
        }

        let upstream =
            UpstreamClient::new(self.config.upstream_timeout).expect("failed to build upstream client");

        let state = AppState {
            endpoints: Arc::new(endpoints),
            upstream: Arc::new(upstream),
            base_url: self.config.base_url.clone(),
            credential: Arc::from(self.config.api_key.as_str()),
        };

        Router::new()
            .route("/health", get(health))
            .route("/cy/players", get(players))
            .route("/cy/players/{playerId}", get(player))
            .route("/cy/players/{playerId}/matches", get(player_matches))
            .route("/cy/matches/{matchId}", get(match_detail))
            .route("/cy/ranking/ratingpoint", get(rating_ranking))
            .route(
                "/cy/ranking/characters/{characterId}/{rankingType}",
                get(character_ranking),
            )
            .route("/cy/ranking/tsj/{tsjType}", get(tsj_ranking))
            .route("/cy/battleitems", get(battleitems))
            .route("/cy/battleitems/{itemId}", get(battleitem))
            .route("/cy/multi/battleitems", get(multi_battleitems))
            .route("/cy/characters", get(characters))
            .route("/cy/position-attributes/{attributeId}", get(position_attributes))
            .with_state(state)
    }

    /// Bind to `0.0.0.0:{port}` and serve until the process exits.
    pub async fn start(self) -> std::io::Result<()> {
        let addr = format!("0.0.0.0:{}", self.config.port);
        let app = self.build_app();
        info!(addr = %addr, "CyGate starting");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Merge path captures and the raw query string into one [`RawInput`].
///
/// Query parsing goes through `form_urlencoded` rather than a typed
/// extractor so repeated keys (`?q=a&q=b`) survive.
fn raw_input(path: HashMap<String, String>, query: Option<String>) -> RawInput {
    let mut raw = RawInput::new();
    for (name, value) in path {
        raw.append(&name, value);
    }
    if let Some(query) = query {
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            raw.append(&name, value.into_owned());
        }
    }
    raw
}

/// `GET /health` — liveness probe.
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "cygate" }))
}

async fn players(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    state.dispatch("players", raw_input(HashMap::new(), query)).await
}

async fn player(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
) -> Response {
    state.dispatch("player", raw_input(path, None)).await
}

async fn player_matches(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
    RawQuery(query): RawQuery,
) -> Response {
    state.dispatch("player-matches", raw_input(path, query)).await
}

async fn match_detail(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
) -> Response {
    state.dispatch("match", raw_input(path, None)).await
}

async fn rating_ranking(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    state.dispatch("rating-ranking", raw_input(HashMap::new(), query)).await
}

async fn character_ranking(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
    RawQuery(query): RawQuery,
) -> Response {
    state.dispatch("character-ranking", raw_input(path, query)).await
}

async fn tsj_ranking(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
    RawQuery(query): RawQuery,
) -> Response {
    state.dispatch("tsj-ranking", raw_input(path, query)).await
}

async fn battleitems(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    state.dispatch("battleitems", raw_input(HashMap::new(), query)).await
}

async fn battleitem(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
) -> Response {
    state.dispatch("battleitem", raw_input(path, None)).await
}

async fn multi_battleitems(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    state
        .dispatch("multi-battleitems", raw_input(HashMap::new(), query))
        .await
}

async fn characters(State(state): State<AppState>) -> Response {
    state.dispatch("characters", RawInput::new()).await
}

async fn position_attributes(
    State(state): State<AppState>,
    Path(path): Path<HashMap<String, String>>,
) -> Response {
    state.dispatch("position-attributes", raw_input(path, None)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_input_merges_path_and_repeated_query_keys() {
        let mut path = HashMap::new();
        path.insert("playerId".to_string(), "p1".to_string());
        let raw = raw_input(path, Some("q=a&q=b&limit=5".to_string()));
        assert_eq!(raw.get("playerId"), Some(&["p1".to_string()][..]));
        assert_eq!(raw.get("q"), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(raw.get("limit"), Some(&["5".to_string()][..]));
    }

    #[test]
    fn raw_input_decodes_percent_escapes() {
        let raw = raw_input(HashMap::new(), Some("nickname=%ED%85%8C%EC%8A%A4%ED%8A%B8".to_string()));
        assert_eq!(raw.get("nickname"), Some(&["테스트".to_string()][..]));
    }
}
