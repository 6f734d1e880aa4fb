//! # Agentic Audit Pipeline
//!
//! `POST /api/v1/agent/run` chains metric extraction, policy checks,
//! checklist generation and report assembly in one request. Runs are
//! stored under `RUN-` ids.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use saro_core::{IdPrefix, RecordId};
use saro_rules::{AgentRun, AgentRunRequest, DocumentAnalysis};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::LimitQuery;
use crate::state::AppState;

/// A custom or non-standard policy document for rule extraction.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NonStandardDocumentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

/// Build the agent router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/agent/run", post(run_agent))
        .route("/api/v1/agent/ingest-nonstandard", post(ingest_nonstandard))
        .route("/api/v1/agent/runs", get(list_runs))
        .route("/api/v1/agent/runs/{id}", get(get_run))
}

/// POST /api/v1/agent/run - Run the full audit pipeline over a model output.
async fn run_agent(
    State(state): State<AppState>,
    body: Result<Json<AgentRunRequest>, JsonRejection>,
) -> Result<Json<AgentRun>, AppError> {
    let req = extract_json(body)?;
    let run_id = RecordId::generate(IdPrefix::Run).into_string();
    let run = state.with_rng(|rng| saro_rules::run_pipeline(rng, saro_core::now(), &run_id, &req));

    state.runs.insert(run_id.clone(), run.clone());
    state.activity.record(
        &run_id,
        "pipeline_run",
        format!("{} / {}: {}", run.model_name, run.policy, run.summary.verdict),
    );
    Ok(Json(run))
}

/// POST /api/v1/agent/ingest-nonstandard - Extract obligations from a custom document.
async fn ingest_nonstandard(
    State(state): State<AppState>,
    body: Result<Json<NonStandardDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentAnalysis>, AppError> {
    let req = extract_json(body)?;
    let doc_id = RecordId::generate(IdPrefix::Document).into_string();
    let title = req.title.unwrap_or_else(|| "Custom Policy".to_string());
    let content = req.content.unwrap_or_default();
    let jurisdiction = req.jurisdiction.unwrap_or_else(|| "EU".to_string());

    let analysis = state.with_rng(|rng| {
        saro_rules::analyse_document(rng, saro_core::now(), &doc_id, &title, &content, &jurisdiction)
    });
    tracing::info!(
        doc_id = %doc_id,
        signals = analysis.signals_detected,
        risk = analysis.overall_risk_score,
        "non-standard document analysed"
    );
    Ok(Json(analysis))
}

/// GET /api/v1/agent/runs - Most recent pipeline runs.
async fn list_runs(State(state): State<AppState>, Query(query): Query<LimitQuery>) -> Json<Value> {
    Json(json!({
        "runs": state.runs.last(query.limit),
        "total": state.runs.len(),
    }))
}

/// GET /api/v1/agent/runs/{id} - Fetch a pipeline run.
async fn get_run(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AgentRun>, AppError> {
    state.runs.get(&id).map(Json).ok_or_else(|| AppError::not_found("Run"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::routes::test_util::{get_json, post_json};
    use axum::http::StatusCode;

    fn seeded_state() -> AppState {
        AppState::with_config(AppConfig {
            rng_seed: Some(42),
            ..AppConfig::default()
        })
    }

    fn app(state: &AppState) -> Router {
        router().with_state(state.clone())
    }

    #[tokio::test]
    async fn text_run_is_stored_and_retrievable() {
        let state = seeded_state();
        let (status, run) = post_json(
            app(&state),
            "/api/v1/agent/run",
            json!({
                "model_name": "CreditScorer-v2",
                "policy": "EU AI Act",
                "domain": "finance",
                "output_text": "Loan denied. No human review available. Black box decision.",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(run["input_type"], "text");
        assert_eq!(run["agent_extracted"], true);
        assert_eq!(run["checklist"].as_array().unwrap().len(), 7);
        assert_eq!(run["pipeline_stages"].as_array().unwrap().len(), 8);

        let id = run["run_id"].as_str().unwrap();
        assert!(id.starts_with("RUN-"));
        let (status, fetched) = get_json(app(&state), &format!("/api/v1/agent/runs/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["run_id"], id);
        assert_eq!(state.activity.recent(1)[0].action, "pipeline_run");
    }

    #[tokio::test]
    async fn structured_run_uses_supplied_metrics() {
        let state = seeded_state();
        let (_, run) = post_json(
            app(&state),
            "/api/v1/agent/run",
            json!({
                "policy": "FDA SaMD",
                "output_data": { "bias_score": 0.5, "accuracy": 0.5, "human_oversight": false },
            }),
        )
        .await;
        assert_eq!(run["input_type"], "structured");
        assert_eq!(run["summary"]["verdict"], "FAIL");
        assert_eq!(run["summary"]["ready_for_submission"], false);
        assert_eq!(run["model_name"], "unnamed-model");
    }

    #[tokio::test]
    async fn runs_list_last_limit() {
        let state = seeded_state();
        for _ in 0..3 {
            post_json(app(&state), "/api/v1/agent/run", json!({})).await;
        }
        let (_, body) = get_json(app(&state), "/api/v1/agent/runs?limit=2").await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["runs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_run_is_404() {
        let state = seeded_state();
        let (status, body) = get_json(app(&state), "/api/v1/agent/runs/RUN-MISSING").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Run not found");
    }

    #[tokio::test]
    async fn nonstandard_document_extracts_rules() {
        let state = seeded_state();
        let (_, body) = post_json(
            app(&state),
            "/api/v1/agent/ingest-nonstandard",
            json!({
                "title": "Internal AI Policy",
                "content": "Use of personal data requires consent. Social scoring is prohibited.",
            }),
        )
        .await;
        assert!(body["doc_id"].as_str().unwrap().starts_with("DOC-"));
        assert_eq!(body["jurisdiction"], "EU");
        let signals: Vec<&str> = body["extracted_rules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["signal"].as_str().unwrap())
            .collect();
        assert!(signals.contains(&"prohibited"));
        assert!(signals.contains(&"privacy"));
        assert_eq!(body["auto_checklist"].as_array().unwrap().len(), signals.len());
    }
}
