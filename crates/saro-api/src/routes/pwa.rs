//! # Progressive Web App Support
//!
//! Web app manifest, offline caching hints and push subscriptions.

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::health::PLATFORM_VERSION;
use crate::state::AppState;

/// Characters of the push endpoint kept as the subscriber id.
const SUBSCRIBER_ID_CHARS: usize = 20;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PushSubscribeRequest {
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Build the PWA router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/manifest.json", get(web_manifest))
        .route("/api/v1/pwa/config", get(pwa_config))
        .route("/api/v1/pwa/subscribe", post(push_subscribe))
}

/// GET /manifest.json - Web app manifest.
async fn web_manifest() -> Json<Value> {
    Json(json!({
        "name": "SARO: AI Regulatory Intelligence",
        "short_name": "SARO",
        "description": "Enterprise AI Compliance & Regulatory Intelligence Platform",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#03070f",
        "theme_color": "#00d4ff",
        "orientation": "any",
        "icons": [
            { "src": "/icon-192.png", "sizes": "192x192", "type": "image/png", "purpose": "any maskable" },
            { "src": "/icon-512.png", "sizes": "512x512", "type": "image/png", "purpose": "any maskable" },
        ],
        "categories": ["business", "productivity", "finance"],
        "shortcuts": [
            { "name": "Dashboard", "url": "/", "description": "Platform overview" },
            { "name": "Run Audit", "url": "/mvp2", "description": "AI model compliance audit" },
            { "name": "Guardrails", "url": "/mvp4", "description": "Real-time guardrail check" },
        ],
    }))
}

/// GET /api/v1/pwa/config - Offline and push configuration.
async fn pwa_config() -> Json<Value> {
    Json(json!({
        "push_enabled": true,
        "offline_mode": true,
        "sync_interval_seconds": 30,
        "cached_routes": ["/api/v1/dashboard", "/api/v1/mvp4/guardrails/stats"],
        "version": PLATFORM_VERSION,
    }))
}

/// POST /api/v1/pwa/subscribe - Register a push subscription.
async fn push_subscribe(body: Result<Json<PushSubscribeRequest>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let req = extract_json(body)?;
    let subscriber_id: String = req
        .endpoint
        .unwrap_or_default()
        .chars()
        .take(SUBSCRIBER_ID_CHARS)
        .collect();
    Ok(Json(json!({
        "subscribed": true,
        "subscriber_id": subscriber_id,
        "topics": ["regulatory_alerts", "audit_completions", "guardrail_blocks"],
        "subscribed_at": saro_core::now(),
    })))
}
