//! Local HTTP API
//!
//! JSON surface over the checker: `POST /check` and `GET /health`. The
//! routing layer owns (de)serialization and status mapping; the checker only
//! returns structured values.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::checker::{CheckReport, UrlChecker};
use crate::{SourceOutcome, VerdictStatus};

/// API state
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<UrlChecker>,
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/check", post(check_url))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
struct CheckResponse {
    url: String,
    status: VerdictStatus,
    reason: String,
    details: CheckDetails,
}

#[derive(Debug, Serialize)]
struct CheckDetails {
    google_safebrowsing: serde_json::Value,
    virustotal: serde_json::Value,
    checked_at: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// POST /check
///
/// 400 for an empty or malformed URL; 200 with a verdict otherwise. Backend
/// failures never surface as HTTP errors, they appear in the per-source
/// details and an `unknown` verdict.
async fn check_url(State(state): State<AppState>, Json(req): Json<CheckRequest>) -> Response {
    match state.checker.check(&req.url).await {
        Ok(report) => (StatusCode::OK, Json(to_response(report))).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

fn to_response(report: CheckReport) -> CheckResponse {
    CheckResponse {
        url: report.url,
        status: report.verdict.status,
        reason: report.verdict.reason,
        details: CheckDetails {
            google_safebrowsing: source_detail(&report.safe_browsing, "matches"),
            virustotal: source_detail(&report.virustotal, "stats"),
            checked_at: report.checked_at.to_rfc3339(),
        },
    }
}

/// Render one source outcome: the payload under its wire key on success,
/// `{"error": ...}` otherwise. The tagged errors become text only here.
fn source_detail<T: Serialize>(outcome: &SourceOutcome<T>, key: &str) -> serde_json::Value {
    match outcome {
        Ok(payload) => serde_json::json!({ key: payload }),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        // No credentials configured: sources report errors without any
        // network traffic, which is all these routing tests need.
        let checker = Arc::new(UrlChecker::new(&AppConfig::default()));
        build_router(AppState { checker })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_check_rejects_missing_url() {
        let response = test_router()
            .oneshot(
                Request::post("/check")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn test_check_rejects_invalid_url() {
        let response = test_router()
            .oneshot(
                Request::post("/check")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url": "not a url"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid URL format");
    }

    #[tokio::test]
    async fn test_unconfigured_sources_yield_unknown_verdict() {
        let response = test_router()
            .oneshot(
                Request::post("/check")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url": "example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["url"], "http://example.com");
        assert_eq!(body["status"], "unknown");
        assert_eq!(
            body["details"]["google_safebrowsing"]["error"],
            "API key not configured"
        );
        assert_eq!(
            body["details"]["virustotal"]["error"],
            "API key not configured"
        );
    }
}
