//! # Model Output Checklists
//!
//! Customers upload a model's output, either structured metrics or a free
//! text description, and receive a pass/warn/critical checklist against a
//! policy benchmark.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use saro_core::{IdPrefix, RecordId};
use saro_rules::benchmark::{self, ModelOutput};
use saro_rules::{Domain, Policy};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::{AppState, UploadRecord};

/// Model output submitted for evaluation. Free text is only used when no
/// structured output is supplied.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UploadModelOutputRequest {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub output_data: ModelOutput,
}

/// Build the model output router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/model-output/upload", post(upload_model_output))
        .route("/api/v1/model-output/uploads", get(list_uploads))
        .route("/api/v1/model-output/policies/list", get(list_policies))
        .route("/api/v1/model-output/{id}", get(get_upload))
}

/// POST /api/v1/model-output/upload - Evaluate a model output against a policy benchmark.
#[utoipa::path(
    post,
    path = "/api/v1/model-output/upload",
    request_body = UploadModelOutputRequest,
    responses(
        (status = 200, description = "Checklist generated", body = UploadRecord),
    ),
    tag = "model-output"
)]
pub(crate) async fn upload_model_output(
    State(state): State<AppState>,
    body: Result<Json<UploadModelOutputRequest>, JsonRejection>,
) -> Result<Json<UploadRecord>, AppError> {
    let req = extract_json(body)?;
    let upload_id = RecordId::generate(IdPrefix::Upload).into_string();
    let policy_name = req.policy.unwrap_or_else(|| Policy::EuAiAct.as_str().to_string());
    let domain_name = req
        .domain
        .map(|d| d.to_lowercase())
        .unwrap_or_else(|| Domain::General.as_str().to_string());
    let raw_text = req.output_text.unwrap_or_default();

    let policy = Policy::resolve(&policy_name);

    let result = state.with_rng(|rng| {
        let output = if !raw_text.is_empty() && req.output_data.is_empty() {
            ModelOutput::from_text(rng, &raw_text)
        } else {
            req.output_data
        };
        benchmark::generate_checklist(rng, &output, policy, Domain::resolve(&domain_name))
    });

    let record = UploadRecord {
        upload_id: upload_id.clone(),
        model_name: req.model_name.unwrap_or_else(|| "unnamed-model".to_string()),
        input_type: if raw_text.is_empty() { "structured" } else { "text" }.to_string(),
        checklist: result.checklist,
        summary: result.summary,
        policy_applied: result.policy_applied.as_str().to_string(),
        benchmark_source: format!("SARO Policy Benchmark: {policy_name}"),
        policy: policy_name,
        domain: domain_name,
        uploaded_at: saro_core::now(),
        agent_processed: !raw_text.is_empty(),
    };
    state.uploads.insert(upload_id.clone(), record.clone());
    tracing::info!(
        upload_id = %upload_id,
        verdict = %record.summary.overall_verdict,
        "model output evaluated"
    );
    Ok(Json(record))
}

/// GET /api/v1/model-output/uploads - Every evaluated upload.
async fn list_uploads(State(state): State<AppState>) -> Json<Value> {
    let uploads = state.uploads.list();
    Json(json!({ "total": uploads.len(), "uploads": uploads }))
}

/// GET /api/v1/model-output/{id} - Fetch an upload.
async fn get_upload(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<UploadRecord>, AppError> {
    state
        .uploads
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Upload"))
}

/// GET /api/v1/model-output/policies/list - Benchmark thresholds per policy.
async fn list_policies() -> Json<Value> {
    Json(json!({ "policies": benchmark::list_benchmarks() }))
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
    async fn text_upload_is_agent_processed() {
        let state = AppState::new();
        let (status, body) = post_json(
            app(&state),
            "/api/v1/model-output/upload",
            json!({
                "model_name": "LoanBot",
                "domain": "Finance",
                "output_text": "Decision uses gender. Black box model, no human involved.",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["input_type"], "text");
        assert_eq!(body["agent_processed"], true);
        assert_eq!(body["domain"], "finance");
        assert_eq!(body["policy"], "EU AI Act");
        assert_eq!(body["benchmark_source"], "SARO Policy Benchmark: EU AI Act");
        assert_eq!(body["checklist"].as_array().unwrap().len(), 6);
        assert_eq!(body["summary"]["overall_verdict"], "FAIL");
    }

    #[tokio::test]
    async fn structured_upload_is_retrievable() {
        let state = AppState::new();
        let (_, body) = post_json(
            app(&state),
            "/api/v1/model-output/upload",
            json!({
                "policy": "ISO 42001",
                "output_data": {
                    "bias_score": 0.01,
                    "transparency_score": 0.95,
                    "accuracy": 0.99,
                    "human_oversight": true,
                    "fields_present": ["confidence_score", "decision_basis", "model_version"],
                },
            }),
        )
        .await;
        assert_eq!(body["input_type"], "structured");
        assert_eq!(body["agent_processed"], false);
        assert_eq!(body["policy_applied"], "ISO 42001");

        let id = body["upload_id"].as_str().unwrap();
        assert!(id.starts_with("UPL-"));
        let (status, _) = get_json(app(&state), &format!("/api/v1/model-output/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        let (_, list) = get_json(app(&state), "/api/v1/model-output/uploads").await;
        assert_eq!(list["total"], 1);
    }

    #[tokio::test]
    async fn unknown_upload_is_404() {
        let state = AppState::new();
        let (status, body) = get_json(app(&state), "/api/v1/model-output/UPL-NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Upload not found");
    }

    #[tokio::test]
    async fn policies_list_has_four_benchmarks() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/model-output/policies/list").await;
        let policies = body["policies"].as_array().unwrap();
        assert_eq!(policies.len(), 4);
        assert_eq!(policies[0]["id"], "EU AI Act");
    }
}
