//! # Standards-Aligned Audit Reports
//!
//! Maps audit findings onto EU AI Act, NIST AI RMF or ISO 42001 controls
//! and stores the resulting report under an `RPT-` id.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use saro_core::{IdPrefix, RecordId};
use saro_rules::{AuditReport, ReportRequest};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Build the audit reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/audit-reports/generate", post(generate_audit_report))
        .route("/api/v1/audit-reports", get(list_audit_reports))
        .route("/api/v1/audit-reports/{id}", get(get_audit_report))
}

/// POST /api/v1/audit-reports/generate - Generate a standards-aligned report.
async fn generate_audit_report(
    State(state): State<AppState>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<AuditReport>, AppError> {
    let req = extract_json(body)?;
    let report_id = RecordId::generate(IdPrefix::Report).into_string();
    let report = state.with_rng(|rng| saro_rules::generate_report(rng, saro_core::now(), &report_id, &req));

    state.reports.insert(report_id.clone(), report.clone());
    tracing::info!(
        report_id = %report_id,
        standard = report.standard.as_str(),
        gaps = report.gaps_identified,
        "audit report generated"
    );
    Ok(Json(report))
}

/// GET /api/v1/audit-reports - Every generated report.
async fn list_audit_reports(State(state): State<AppState>) -> Json<Value> {
    let reports = state.reports.list();
    Json(json!({ "total": reports.len(), "reports": reports }))
}

/// GET /api/v1/audit-reports/{id} - Fetch a report.
async fn get_audit_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AuditReport>, AppError> {
    state
        .reports
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Report"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{get_json, post_json};
    use axum::http::StatusCode;

    fn app(state: &AppState) -> Router {
        router().with_state(state.clone())
    }

    #[tokio::test]
    async fn default_report_uses_default_findings() {
        let state = AppState::new();
        let (status, report) = post_json(app(&state), "/api/v1/audit-reports/generate", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["standard"], "EU AI Act");
        assert_eq!(report["model_name"], "unnamed-model");
        assert_eq!(report["executive_summary"]["total_findings"], 3);
        assert_eq!(report["evidence_chain"].as_array().unwrap().len(), 4);

        let id = report["report_id"].as_str().unwrap();
        let (status, fetched) = get_json(app(&state), &format!("/api/v1/audit-reports/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["report_id"], id);

        let (_, list) = get_json(app(&state), "/api/v1/audit-reports").await;
        assert_eq!(list["total"], 1);
    }

    #[tokio::test]
    async fn audit_result_overrides_defaults() {
        let state = AppState::new();
        let (_, report) = post_json(
            app(&state),
            "/api/v1/audit-reports/generate",
            json!({
                "standard": "NIST AI RMF",
                "audit_result": {
                    "model_name": "HRScreener",
                    "compliance_score": 0.6,
                    "findings": [
                        { "category": "Bias", "finding": "Gender skew", "severity": "critical" }
                    ],
                },
            }),
        )
        .await;
        assert_eq!(report["standard"], "NIST AI RMF");
        assert_eq!(report["model_name"], "HRScreener");
        assert_eq!(report["executive_summary"]["critical"], 1);
        assert_eq!(report["ready_for_submission"], false);
    }

    #[tokio::test]
    async fn unknown_report_is_404() {
        let state = AppState::new();
        let (status, body) = get_json(app(&state), "/api/v1/audit-reports/RPT-NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Report not found");
    }
}
