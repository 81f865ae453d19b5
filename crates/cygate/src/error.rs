//! Gateway error types.
//!
//! Client-input failures carry the full violation list and never reach the
//! upstream; transport failures distinguish "could not connect" from "did
//! not answer in time".  A non-2xx *response* from the upstream is not an
//! error here — it is relayed verbatim by the dispatch path.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cygate_core::ValidationError;
use serde_json::json;
use thiserror::Error;

/// Gateway-level errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request validation failed: {0}")]
    BadRequest(#[from] ValidationError),

    #[error("upstream did not respond within the deadline")]
    UpstreamTimeout,

    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message, violations) = match &self {
            GatewayError::BadRequest(err) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                err.to_string(),
                Some(err.violations.clone()),
            ),
            GatewayError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                self.to_string(),
                None,
            ),
            GatewayError::UpstreamUnreachable(_) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNREACHABLE",
                self.to_string(),
                None,
            ),
            GatewayError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                self.to_string(),
                None,
            ),
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(violations) = violations {
            error["violations"] = json!(violations);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cygate_core::Violation;

    #[tokio::test]
    async fn bad_request_body_lists_every_violation() {
        let err = GatewayError::BadRequest(ValidationError {
            violations: vec![
                Violation::MissingParameter {
                    name: "nickname".into(),
                },
                Violation::TypeMismatch {
                    name: "limit".into(),
                    expected: "integer",
                },
            ],
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"]["violations"][0]["kind"], "missing_parameter");
        assert_eq!(body["error"]["violations"][1]["name"], "limit");
    }

    #[test]
    fn transport_errors_map_to_gateway_statuses() {
        assert_eq!(
            GatewayError::UpstreamTimeout.into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            GatewayError::UpstreamUnreachable("connection refused".into())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
