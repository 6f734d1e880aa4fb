//! # Platform Banner, Health & Metrics
//!
//! Root-level endpoints used by load balancers and scrapers, plus the
//! versioned service health report.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::state::AppState;

/// Platform version reported by every banner and health payload.
pub const PLATFORM_VERSION: &str = "4.0.0";

/// Service health report.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    #[schema(value_type = Object)]
    pub services: Value,
    #[schema(value_type = Object)]
    pub mvps: Value,
    pub requests_served: u64,
    pub request_errors: u64,
}

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_root))
        .route("/metrics", get(prometheus_metrics))
        .route("/api/v1/health", get(health_check))
}

/// GET / - Platform banner.
async fn banner() -> Json<Value> {
    Json(json!({
        "platform": "SARO - AI Regulatory Intelligence",
        "version": PLATFORM_VERSION,
        "mvps": [
            "MVP1: Forecast",
            "MVP2: Audit",
            "MVP3: Enterprise",
            "MVP4: Agentic GA",
            "MVP5: Autonomous",
        ],
        "status": "operational",
        "docs": "/openapi.json",
    }))
}

/// GET /health - Minimal health payload for platform health checks.
async fn health_root() -> Json<Value> {
    Json(json!({ "status": "healthy", "version": PLATFORM_VERSION }))
}

/// GET /metrics - Prometheus exposition of request metrics.
///
/// Empty when no exporter is installed (as in tests).
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

/// GET /api/v1/health - Service and MVP health.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service health", body = HealthReport),
    ),
    tag = "health"
)]
pub(crate) async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy",
        timestamp: saro_core::now(),
        version: PLATFORM_VERSION,
        services: json!({
            "api": "operational",
            "database": "operational",
            "redis": "operational",
            "guardrails": "operational",
        }),
        mvps: json!({
            "mvp1_ingestion": "operational",
            "mvp2_audit": "operational",
            "mvp3_enterprise": "operational",
            "mvp4_agentic": "operational",
            "mvp5_autonomous": if state.config.enable_agentic { "operational" } else { "disabled" },
        }),
        requests_served: state.metrics.requests(),
        request_errors: state.metrics.errors(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{get_json, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn banner_names_platform() {
        let app = router().with_state(AppState::new());
        let (status, body) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["platform"], "SARO - AI Regulatory Intelligence");
        assert_eq!(body["version"], "4.0.0");
    }

    #[tokio::test]
    async fn versioned_health_reports_services() {
        let app = router().with_state(AppState::new());
        let (status, body) = get_json(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"]["guardrails"], "operational");
        assert_eq!(body["mvps"]["mvp1_ingestion"], "operational");
    }

    #[tokio::test]
    async fn metrics_empty_without_exporter() {
        let app = router().with_state(AppState::new());
        let (status, body) = send(app, "GET", "/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }
}
