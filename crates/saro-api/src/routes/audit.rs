//! # MVP2: Audit Engine & L1 Orchestrator
//!
//! Model audits keyed on use case and jurisdiction, the regulatory
//! requirements matrix, per-model compliance map, fast policy evaluation,
//! the activity log and the orchestrator pipeline.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::seq::SliceRandom;
use rand::Rng;
use saro_core::{date_in_days, now, round_to, uniform, IdPrefix, RecordId};
use saro_rules::audit;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, require_text, Validate};
use crate::routes::LimitQuery;
use crate::state::{ActivityEntry, AppState, AuditRecord};

/// Regulations tracked by the compliance map.
const MAPPED_REGULATIONS: [&str; 8] = [
    "EU-AI-ACT",
    "NIST-RMF",
    "GDPR",
    "HIPAA",
    "ISO-42001",
    "SEC-AI",
    "MAS-TREX",
    "CHINA-ALGO",
];

const POLICY_SUGGESTIONS: [&str; 3] = [
    "Add explicit consent mechanism for data processing",
    "Include model explainability documentation",
    "Define human oversight procedure",
];

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request to audit a model.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditRequest {
    pub model_name: String,
    pub model_version: String,
    pub use_case: String,
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    #[serde(default)]
    pub risk_category: Option<String>,
    #[serde(default)]
    pub training_data_description: Option<String>,
    #[serde(default)]
    pub deployment_context: Option<String>,
}

fn default_jurisdiction() -> String {
    "EU".to_string()
}

impl Validate for AuditRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("model_name", &self.model_name)?;
        require_text("model_version", &self.model_version)?;
        require_text("use_case", &self.use_case)
    }
}

/// Request to evaluate policy text against a regulation.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PolicyEvaluateRequest {
    #[serde(default)]
    pub policy_text: Option<String>,
    #[serde(default)]
    pub regulation_id: Option<String>,
}

/// Outcome of a fast policy evaluation.
#[derive(Debug, Serialize, ToSchema)]
pub struct PolicyEvaluation {
    pub regulation_id: String,
    pub compliant: bool,
    pub score: f64,
    pub violations: u32,
    pub suggestions: Vec<String>,
    pub latency_ms: f64,
    pub throughput_capable: &'static str,
}

/// Last 20 activity entries plus the total count.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogResponse {
    pub logs: Vec<ActivityEntry>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct MatrixQuery {
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the audit and orchestrator router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp2/audit", post(run_audit))
        .route("/api/v1/mvp2/audits", get(list_audits))
        .route("/api/v1/mvp2/audits/{id}", get(get_audit))
        .route("/api/v1/mvp2/compliance-matrix", get(compliance_matrix))
        .route("/api/v1/mvp2/compliance-map", get(compliance_map))
        .route("/api/v1/mvp2/policy/evaluate", post(evaluate_policy))
        .route("/api/v1/mvp2/audit-log", get(audit_log))
        .route("/api/v1/mvp2/orchestrate", post(orchestrate))
        .route("/api/v1/mvp2/pipeline-status", get(pipeline_status))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/mvp2/audit - Run a compliance audit for a model.
#[utoipa::path(
    post,
    path = "/api/v1/mvp2/audit",
    request_body = AuditRequest,
    responses(
        (status = 200, description = "Audit completed", body = AuditRecord),
        (status = 422, description = "Blank required field", body = crate::error::ErrorBody),
    ),
    tag = "mvp2"
)]
pub(crate) async fn run_audit(
    State(state): State<AppState>,
    body: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditRecord>, AppError> {
    let req = extract_validated_json(body)?;
    let audit_id = RecordId::generate(IdPrefix::Audit).into_string();
    let assessment = state.with_rng(|rng| audit::assess(rng, &req.use_case, &req.jurisdiction));
    let generated_at = now();

    let record = AuditRecord {
        audit_id: audit_id.clone(),
        model_name: req.model_name.clone(),
        overall_risk: assessment.overall_risk,
        compliance_score: assessment.compliance_score,
        findings: assessment.findings,
        recommendations: assessment.recommendations,
        applicable_regulations: assessment.applicable_regulations,
        status: assessment.status,
        generated_at,
        next_review_date: date_in_days(generated_at, 90),
    };
    state.audits.insert(audit_id.clone(), record.clone());
    state
        .activity
        .record(&audit_id, "audit_completed", format!("{} {}", req.model_name, req.model_version));
    tracing::info!(
        audit_id = %audit_id,
        status = %record.status,
        risk = %record.overall_risk,
        "model audit completed"
    );

    Ok(Json(record))
}

/// GET /api/v1/mvp2/audits - List audits (first `limit`).
#[utoipa::path(
    get,
    path = "/api/v1/mvp2/audits",
    params(("limit" = Option<usize>, Query, description = "Maximum audits returned (default 20)")),
    responses(
        (status = 200, description = "Audits in creation order", body = Vec<AuditRecord>),
    ),
    tag = "mvp2"
)]
pub(crate) async fn list_audits(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<AuditRecord>> {
    Json(state.audits.list().into_iter().take(query.limit).collect())
}

/// GET /api/v1/mvp2/audits/{id} - Fetch an audit.
#[utoipa::path(
    get,
    path = "/api/v1/mvp2/audits/{id}",
    params(("id" = String, Path, description = "Audit identifier (AUDIT-XXXXXXXX)")),
    responses(
        (status = 200, description = "Audit found", body = AuditRecord),
        (status = 404, description = "Audit not found", body = crate::error::ErrorBody),
    ),
    tag = "mvp2"
)]
pub(crate) async fn get_audit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    state
        .audits
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Audit"))
}

/// GET /api/v1/mvp2/compliance-matrix - Regulatory requirements matrix.
async fn compliance_matrix(Query(query): Query<MatrixQuery>) -> Json<Value> {
    Json(json!({
        "jurisdiction": query.jurisdiction,
        "generated_at": now(),
        "regulations": [
            {
                "name": "EU AI Act",
                "articles": [
                    "Art. 9 (Risk Management)",
                    "Art. 10 (Data Governance)",
                    "Art. 11 (Technical Documentation)",
                    "Art. 13 (Transparency)",
                    "Art. 14 (Human Oversight)",
                    "Art. 15 (Accuracy & Robustness)",
                ],
                "enforcement_date": "2025-08-01",
                "penalty": "€30M or 6% global turnover",
                "applicability": "High-risk AI systems",
            },
            {
                "name": "GDPR",
                "articles": [
                    "Art. 22 (Automated Decision-Making)",
                    "Art. 25 (Privacy by Design)",
                    "Art. 35 (DPIA)",
                    "Art. 13/14 (Transparency)",
                ],
                "enforcement_date": "2018-05-25",
                "penalty": "€20M or 4% global turnover",
                "applicability": "All AI processing personal data",
            },
        ],
    }))
}

/// GET /api/v1/mvp2/compliance-map - Per-model scores for a random subset of regulations.
async fn compliance_map(State(state): State<AppState>) -> Json<Value> {
    let map: Vec<Value> = state.with_rng(|rng| {
        (1..=7)
            .map(|i| {
                let k = rng.gen_range(3..=6);
                let chosen: Vec<&str> = MAPPED_REGULATIONS.choose_multiple(rng, k).copied().collect();
                let regulations: serde_json::Map<String, Value> = chosen
                    .into_iter()
                    .map(|id| (id.to_string(), json!(round_to(uniform(rng, 70.0, 100.0), 1))))
                    .collect();
                json!({ "model_id": format!("model-{i:03}"), "regulations": regulations })
            })
            .collect()
    });
    Json(json!({ "map": map }))
}

/// POST /api/v1/mvp2/policy/evaluate - Evaluate policy text against a regulation.
#[utoipa::path(
    post,
    path = "/api/v1/mvp2/policy/evaluate",
    request_body = PolicyEvaluateRequest,
    responses(
        (status = 200, description = "Evaluation result", body = PolicyEvaluation),
    ),
    tag = "mvp2"
)]
pub(crate) async fn evaluate_policy(
    State(state): State<AppState>,
    body: Result<Json<PolicyEvaluateRequest>, JsonRejection>,
) -> Result<Json<PolicyEvaluation>, AppError> {
    let req = extract_json(body)?;
    let regulation_id = req.regulation_id.unwrap_or_else(|| "EU-AI-ACT".to_string());
    let evaluation = state.with_rng(|rng| {
        let kept = rng.gen_range(0..=POLICY_SUGGESTIONS.len());
        PolicyEvaluation {
            regulation_id,
            compliant: rng.gen::<f64>() > 0.25,
            score: round_to(uniform(rng, 0.6, 0.99), 2),
            violations: rng.gen_range(0..=3),
            suggestions: POLICY_SUGGESTIONS[..kept].iter().map(|s| s.to_string()).collect(),
            latency_ms: round_to(uniform(rng, 12.0, 45.0), 1),
            throughput_capable: "50,000 evals/sec",
        }
    });
    tracing::debug!(
        regulation = %evaluation.regulation_id,
        compliant = evaluation.compliant,
        "policy evaluated"
    );
    Ok(Json(evaluation))
}

/// GET /api/v1/mvp2/audit-log - Recent platform activity.
#[utoipa::path(
    get,
    path = "/api/v1/mvp2/audit-log",
    responses(
        (status = 200, description = "Last 20 entries and total", body = AuditLogResponse),
    ),
    tag = "mvp2"
)]
pub(crate) async fn audit_log(State(state): State<AppState>) -> Json<AuditLogResponse> {
    Json(AuditLogResponse {
        logs: state.activity.recent(20),
        total: state.activity.len(),
    })
}

/// POST /api/v1/mvp2/orchestrate - Run the five-step orchestration pipeline.
async fn orchestrate(body: Result<Json<Value>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let _payload = extract_json(body)?;
    let steps: [(&str, u32); 5] = [
        ("document_ingestion", 145),
        ("entity_extraction", 89),
        ("risk_scoring", 203),
        ("regulation_mapping", 67),
        ("report_generation", 312),
    ];
    let total: u32 = steps.iter().map(|(_, ms)| ms).sum();
    let pipeline_steps: Vec<Value> = steps
        .iter()
        .map(|(step, ms)| json!({ "step": step, "status": "completed", "duration_ms": ms }))
        .collect();

    Ok(Json(json!({
        "job_id": uuid::Uuid::new_v4().to_string(),
        "status": "completed",
        "pipeline_steps": pipeline_steps,
        "total_duration_ms": total,
        "output": {
            "compliance_score": 0.78,
            "risk_level": "medium",
            "regulations_checked": 12,
            "findings": 3,
        },
        "completed_at": now(),
    })))
}

/// GET /api/v1/mvp2/pipeline-status - Orchestrator throughput.
async fn pipeline_status() -> Json<Value> {
    Json(json!({
        "active_jobs": 3,
        "queue_depth": 7,
        "throughput_per_hour": 847,
        "avg_latency_ms": 623,
        "success_rate": 0.998,
        "uptime_hours": 2184,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{get_json, post_json};
    use axum::http::StatusCode;

    fn app(state: &AppState) -> Router {
        router().with_state(state.clone())
    }

    fn audit_body(use_case: &str) -> Value {
        json!({
            "model_name": "CreditScorer",
            "model_version": "2.1",
            "use_case": use_case,
        })
    }

    #[tokio::test]
    async fn hr_audit_is_critical() {
        let state = AppState::new();
        let (status, body) = post_json(app(&state), "/api/v1/mvp2/audit", audit_body("hr screening")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["audit_id"].as_str().unwrap().starts_with("AUDIT-"));
        assert_eq!(body["overall_risk"], "critical");
        assert_eq!(body["status"], "non_compliant");
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn audits_are_listed_and_fetched() {
        let state = AppState::new();
        let (_, created) = post_json(app(&state), "/api/v1/mvp2/audit", audit_body("finance lending")).await;
        let id = created["audit_id"].as_str().unwrap();

        let (status, fetched) = get_json(app(&state), &format!("/api/v1/mvp2/audits/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["model_name"], "CreditScorer");

        let (_, listed) = get_json(app(&state), "/api/v1/mvp2/audits").await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (_, log) = get_json(app(&state), "/api/v1/mvp2/audit-log").await;
        assert_eq!(log["total"], 1);
        assert_eq!(log["logs"][0]["action"], "audit_completed");
    }

    #[tokio::test]
    async fn missing_use_case_is_bad_request() {
        let state = AppState::new();
        let (status, body) = post_json(
            app(&state),
            "/api/v1/mvp2/audit",
            json!({ "model_name": "m", "model_version": "1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unknown_audit_is_404() {
        let state = AppState::new();
        let (status, body) = get_json(app(&state), "/api/v1/mvp2/audits/AUDIT-00000000").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Audit not found");
    }

    #[tokio::test]
    async fn compliance_map_covers_seven_models() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/mvp2/compliance-map").await;
        let rows = body["map"].as_array().unwrap();
        assert_eq!(rows.len(), 7);
        for row in rows {
            let n = row["regulations"].as_object().unwrap().len();
            assert!((3..=6).contains(&n));
        }
    }

    #[tokio::test]
    async fn policy_evaluation_bounds() {
        let state = AppState::new();
        let (status, body) = post_json(
            app(&state),
            "/api/v1/mvp2/policy/evaluate",
            json!({ "policy_text": "We process data", "regulation_id": "GDPR" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["regulation_id"], "GDPR");
        let score = body["score"].as_f64().unwrap();
        assert!((0.6..=0.99).contains(&score));
        assert!(body["suggestions"].as_array().unwrap().len() <= 3);
    }

    #[tokio::test]
    async fn orchestrate_reports_steps() {
        let state = AppState::new();
        let (_, body) = post_json(app(&state), "/api/v1/mvp2/orchestrate", json!({})).await;
        assert_eq!(body["total_duration_ms"], 816);
        assert_eq!(body["pipeline_steps"].as_array().unwrap().len(), 5);
    }
}
