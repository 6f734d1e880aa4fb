//! # MVP5: Autonomous Remediation Bots
//!
//! Bots act on audit findings (retraining, policy pushes, oversight
//! checkpoints) and every action is reversible through its job id.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::seq::SliceRandom;
use rand::Rng;
use saro_core::{minutes_before, round_to, uniform, IdPrefix, RecordId};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::LimitQuery;
use crate::state::{AppState, BotJobRecord};

/// (bot type, display name, description)
const BOT_TYPES: [(&str, &str, &str); 4] = [
    ("retrain_bot", "Auto-Retrain Bot", "Triggers model retraining when drift detected"),
    ("policy_bot", "Policy Enforcement Bot", "Auto-applies policy updates across tenants"),
    ("oversight_bot", "Oversight Injection Bot", "Injects human review checkpoints"),
    ("remediation_bot", "Risk Remediation Bot", "Auto-remediates low-risk findings"),
];

/// (action taken, bot type)
const SAMPLE_ACTIONS: [(&str, &str); 5] = [
    ("Bias threshold exceeded: triggered auto-retrain on CreditScorer-v2", "retrain_bot"),
    ("EU AI Act Art.13 gap: policy update pushed to 20 tenants", "policy_bot"),
    ("High-risk decision detected: human review checkpoint injected", "oversight_bot"),
    ("PII exposure pattern: remediation applied, audit trail logged", "remediation_bot"),
    ("Model drift detected: shadow deployment initiated for A/B test", "retrain_bot"),
];

/// Characters of the action echoed back in a revert message.
const REVERT_PREVIEW_CHARS: usize = 60;

fn bot_name(bot_type: &str) -> String {
    BOT_TYPES
        .iter()
        .find(|(kind, ..)| *kind == bot_type)
        .map_or_else(|| bot_type.to_string(), |(_, name, _)| name.to_string())
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ExecuteBotRequest {
    #[serde(default)]
    pub bot_type: Option<String>,
    #[serde(default)]
    pub finding_id: Option<String>,
}

/// Build the bots router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp5/bots/execute", post(execute_bot))
        .route("/api/v1/mvp5/bots/revert/{job_id}", post(revert_bot_action))
        .route("/api/v1/mvp5/bots/actions", get(list_bot_actions))
        .route("/api/v1/mvp5/bots/status", get(bot_status))
}

fn seed_actions(state: &AppState) {
    state.bot_jobs.ensure_seeded(|| {
        let now = saro_core::now();
        state.with_rng(|rng| {
            SAMPLE_ACTIONS
                .iter()
                .map(|(action, bot_type)| {
                    let job_id = RecordId::generate(IdPrefix::Bot).into_string();
                    let record = BotJobRecord {
                        job_id: job_id.clone(),
                        bot_type: bot_type.to_string(),
                        bot_name: bot_name(bot_type),
                        finding_id: None,
                        status: "completed".to_string(),
                        action_taken: action.to_string(),
                        execution_time_ms: round_to(uniform(rng, 800.0, 3000.0), 0) as u64,
                        reversible: true,
                        revert_token: None,
                        logged_to_chain: true,
                        completed_at: minutes_before(now, rng.gen_range(5..=120)),
                    };
                    (job_id, record)
                })
                .collect()
        })
    });
}

/// POST /api/v1/mvp5/bots/execute - Run a remediation bot against a finding.
#[utoipa::path(
    post,
    path = "/api/v1/mvp5/bots/execute",
    request_body = ExecuteBotRequest,
    responses(
        (status = 200, description = "Bot action completed", body = BotJobRecord),
    ),
    tag = "mvp5"
)]
pub(crate) async fn execute_bot(
    State(state): State<AppState>,
    body: Result<Json<ExecuteBotRequest>, JsonRejection>,
) -> Result<Json<BotJobRecord>, AppError> {
    let req = extract_json(body)?;
    seed_actions(&state);

    let job_id = RecordId::generate(IdPrefix::Bot).into_string();
    let bot_type = req.bot_type.unwrap_or_else(|| "remediation_bot".to_string());
    let (action, execution_ms) = state.with_rng(|rng| {
        let (action, _) = SAMPLE_ACTIONS.choose(rng).copied().unwrap_or(SAMPLE_ACTIONS[0]);
        (action, round_to(uniform(rng, 800.0, 4200.0), 0) as u64)
    });

    let record = BotJobRecord {
        job_id: job_id.clone(),
        bot_name: bot_name(&bot_type),
        bot_type,
        finding_id: Some(
            req.finding_id
                .unwrap_or_else(|| RecordId::generate(IdPrefix::Finding).into_string()),
        ),
        status: "completed".to_string(),
        action_taken: action.to_string(),
        execution_time_ms: execution_ms,
        reversible: true,
        revert_token: Some(uuid::Uuid::new_v4().to_string()),
        logged_to_chain: true,
        completed_at: saro_core::now(),
    };
    state.bot_jobs.insert(job_id.clone(), record.clone());
    tracing::info!(job_id = %job_id, bot_type = %record.bot_type, "bot action executed");
    Ok(Json(record))
}

/// POST /api/v1/mvp5/bots/revert/{job_id} - Revert a bot action.
async fn revert_bot_action(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let job = state
        .bot_jobs
        .get(&job_id)
        .ok_or_else(|| AppError::not_found("Job"))?;
    let preview: String = job.action_taken.chars().take(REVERT_PREVIEW_CHARS).collect();
    let revert_ms = state.with_rng(|rng| round_to(uniform(rng, 200.0, 800.0), 0));
    tracing::info!(job_id = %job_id, "bot action reverted");
    Ok(Json(json!({
        "job_id": job_id,
        "reverted": true,
        "revert_time_ms": revert_ms,
        "message": format!("Action successfully reverted: {preview}..."),
        "reverted_at": saro_core::now(),
    })))
}

/// GET /api/v1/mvp5/bots/actions - Most recent bot actions.
async fn list_bot_actions(State(state): State<AppState>, Query(query): Query<LimitQuery>) -> Json<Value> {
    seed_actions(&state);
    Json(json!({
        "actions": state.bot_jobs.last(query.limit),
        "total": state.bot_jobs.len(),
    }))
}

/// GET /api/v1/mvp5/bots/status - Fleet status.
async fn bot_status(State(state): State<AppState>) -> Json<Value> {
    let now = saro_core::now();
    let bots: Vec<Value> = state.with_rng(|rng| {
        BOT_TYPES
            .iter()
            .map(|(id, name, desc)| {
                json!({
                    "id": id,
                    "name": name,
                    "desc": desc,
                    "status": "active",
                    "actions_today": rng.gen_range(12..=89),
                    "success_rate": round_to(uniform(rng, 0.93, 0.99), 3),
                    "last_action": minutes_before(now, rng.gen_range(1..=30)),
                })
            })
            .collect()
    });
    Json(json!({
        "bots": bots,
        "total_actions_today": 247,
        "success_rate": 0.962,
        "avg_execution_ms": 2140,
        "estimated_hours_saved": 41.2,
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

    #[tokio::test]
    async fn seeded_actions_precede_executed_jobs() {
        let state = AppState::new();
        let (_, executed) = post_json(
            app(&state),
            "/api/v1/mvp5/bots/execute",
            json!({ "bot_type": "policy_bot", "finding_id": "FIND-ABC123" }),
        )
        .await;
        assert_eq!(executed["bot_name"], "Policy Enforcement Bot");
        assert_eq!(executed["finding_id"], "FIND-ABC123");
        assert!(executed["revert_token"].is_string());

        let (_, body) = get_json(app(&state), "/api/v1/mvp5/bots/actions").await;
        assert_eq!(body["total"], 6);
        let actions = body["actions"].as_array().unwrap();
        assert_eq!(actions[5]["job_id"], executed["job_id"]);
        assert!(actions[0]["revert_token"].is_null());
    }

    #[tokio::test]
    async fn unknown_bot_type_keeps_its_name() {
        let state = AppState::new();
        let (_, body) = post_json(app(&state), "/api/v1/mvp5/bots/execute", json!({ "bot_type": "custom" })).await;
        assert_eq!(body["bot_name"], "custom");
        assert!(body["finding_id"].as_str().unwrap().starts_with("FIND-"));
    }

    #[tokio::test]
    async fn revert_known_and_unknown_jobs() {
        let state = AppState::new();
        let (_, job) = post_json(app(&state), "/api/v1/mvp5/bots/execute", json!({})).await;
        let uri = format!("/api/v1/mvp5/bots/revert/{}", job["job_id"].as_str().unwrap());
        let (status, body) = post_json(app(&state), &uri, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reverted"], true);
        assert!(body["message"].as_str().unwrap().starts_with("Action successfully reverted: "));

        let (status, body) = post_json(app(&state), "/api/v1/mvp5/bots/revert/BOT-NOPE", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job not found");
    }

    #[tokio::test]
    async fn status_lists_four_bots() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/mvp5/bots/status").await;
        assert_eq!(body["bots"].as_array().unwrap().len(), 4);
    }
}
