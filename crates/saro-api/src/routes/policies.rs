//! # Policy Library & Regulatory Feed Log
//!
//! The library starts with eight reference documents and grows through
//! uploads; reviewers move documents between `reviewed`, `pending_review`
//! and `flagged`. The feed log holds items pulled from regulator feeds.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rand::Rng;
use saro_core::{minutes_after, minutes_before, round_to, uniform, IdPrefix, RecordId};
use saro_rules::policy_library::{self, ReviewStatus, SAMPLE_FEEDS, SAMPLE_POLICIES};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::{all, matches_filter, JurisdictionQuery};
use crate::state::{AppState, FeedRecord, PolicyRecord};

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PolicyQuery {
    #[serde(default = "all")]
    pub jurisdiction: String,
    #[serde(default = "all")]
    pub status: String,
}

/// A policy document uploaded by a user.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UploadPolicyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub regulation: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the policy library router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/policies", get(list_policies))
        .route("/api/v1/policies/upload", post(upload_policy))
        .route("/api/v1/policies/{id}/review", put(review_policy))
        .route("/api/v1/feed-log", get(feed_log))
        .route("/api/v1/feed-log/{id}/approve", post(approve_feed))
}

fn seed(state: &AppState) {
    let now = saro_core::now();
    state.policies.ensure_seeded(|| {
        state.with_rng(|rng| {
            SAMPLE_POLICIES
                .iter()
                .map(|s| {
                    let policy_id = RecordId::generate(IdPrefix::Policy).into_string();
                    let record = PolicyRecord {
                        policy_id: policy_id.clone(),
                        title: s.title.to_string(),
                        source: s.source.to_string(),
                        jurisdiction: s.jurisdiction.to_string(),
                        regulation: s.regulation.to_string(),
                        doc_type: s.doc_type.to_string(),
                        risk_score: s.risk_score,
                        risk_tags: Vec::new(),
                        entities: vec![
                            "AI System".to_string(),
                            s.regulation.to_string(),
                            s.jurisdiction.to_string(),
                        ],
                        status: s.status,
                        word_count: rng.gen_range(800..=8000),
                        content_preview: None,
                        ingested_at: now - chrono::Duration::days(rng.gen_range(1..=30)),
                        reviewed_at: None,
                        reviewer_notes: None,
                    };
                    (policy_id, record)
                })
                .collect()
        })
    });
    state.feeds.ensure_seeded(|| {
        state.with_rng(|rng| {
            SAMPLE_FEEDS
                .iter()
                .map(|f| {
                    let feed_id = RecordId::generate(IdPrefix::Feed).into_string();
                    let record = FeedRecord {
                        feed_id: feed_id.clone(),
                        feed: f.feed.to_string(),
                        jurisdiction: f.jurisdiction.to_string(),
                        regulation: f.regulation.to_string(),
                        headline: f.headline.to_string(),
                        status: f.status,
                        is_new: f.is_new,
                        impact: f.impact,
                        fetched_at: now - chrono::Duration::hours(rng.gen_range(1..=48)),
                        risk_score: round_to(uniform(rng, 0.5, 0.95), 2),
                        approved_at: None,
                    };
                    (feed_id, record)
                })
                .collect()
        })
    });
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/policies - Library documents filtered by jurisdiction and status.
async fn list_policies(State(state): State<AppState>, Query(query): Query<PolicyQuery>) -> Json<Value> {
    seed(&state);
    let policies: Vec<PolicyRecord> = state
        .policies
        .list()
        .into_iter()
        .filter(|p| matches_filter(&query.jurisdiction, &p.jurisdiction))
        .filter(|p| matches_filter(&query.status, p.status.as_str()))
        .collect();
    Json(json!({ "total": policies.len(), "policies": policies }))
}

/// POST /api/v1/policies/upload - Add a user document to the library.
#[utoipa::path(
    post,
    path = "/api/v1/policies/upload",
    request_body = UploadPolicyRequest,
    responses(
        (status = 200, description = "Policy scored and queued for review", body = PolicyRecord),
    ),
    tag = "policies"
)]
pub(crate) async fn upload_policy(
    State(state): State<AppState>,
    body: Result<Json<UploadPolicyRequest>, JsonRejection>,
) -> Result<Json<PolicyRecord>, AppError> {
    let req = extract_json(body)?;
    seed(&state);

    let content = req.content.unwrap_or_default();
    let jurisdiction = req.jurisdiction.unwrap_or_else(|| "EU".to_string());
    let regulation = req.regulation.unwrap_or_else(|| "General".to_string());
    let score = state.with_rng(|rng| policy_library::score_upload(rng, &content));

    let policy_id = RecordId::generate(IdPrefix::Policy).into_string();
    let record = PolicyRecord {
        policy_id: policy_id.clone(),
        title: req.title.unwrap_or_else(|| "Uploaded Policy".to_string()),
        source: "User Upload".to_string(),
        entities: vec!["AI System".to_string(), jurisdiction.clone(), regulation.clone()],
        jurisdiction,
        regulation,
        doc_type: req.doc_type.unwrap_or_else(|| "policy".to_string()),
        risk_score: score.risk_score,
        risk_tags: score.risk_tags,
        status: ReviewStatus::PendingReview,
        word_count: score.word_count,
        content_preview: Some(score.content_preview),
        ingested_at: saro_core::now(),
        reviewed_at: None,
        reviewer_notes: None,
    };
    state.policies.insert(policy_id.clone(), record.clone());
    tracing::info!(policy_id = %policy_id, risk_score = record.risk_score, "policy uploaded");
    Ok(Json(record))
}

/// PUT /api/v1/policies/{id}/review - Record a review decision.
async fn review_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<PolicyRecord>, AppError> {
    let req = extract_json(body)?;
    seed(&state);

    let requested = req.status.unwrap_or_else(|| ReviewStatus::Reviewed.as_str().to_string());
    let status = ReviewStatus::parse(&requested).ok_or_else(|| {
        AppError::Validation(format!(
            "status must be one of reviewed, pending_review, flagged (got '{requested}')"
        ))
    })?;
    let notes = req.notes.unwrap_or_default();

    let updated = state
        .policies
        .update(&id, |p| {
            p.status = status;
            p.reviewed_at = Some(saro_core::now());
            p.reviewer_notes = Some(notes);
        })
        .ok_or_else(|| AppError::not_found("Policy"))?;
    tracing::info!(policy_id = %id, status = status.as_str(), "policy reviewed");
    Ok(Json(updated))
}

/// GET /api/v1/feed-log - Regulatory feed items and polling schedule.
async fn feed_log(State(state): State<AppState>, Query(query): Query<JurisdictionQuery>) -> Json<Value> {
    seed(&state);
    let now = saro_core::now();
    let feeds: Vec<FeedRecord> = state
        .feeds
        .list()
        .into_iter()
        .filter(|f| matches_filter(&query.jurisdiction, &f.jurisdiction))
        .collect();
    let new_count = feeds.iter().filter(|f| f.is_new).count();
    Json(json!({
        "total": feeds.len(),
        "new_count": new_count,
        "feeds": feeds,
        "last_polled": minutes_before(now, 12),
        "next_poll": minutes_after(now, 48),
    }))
}

/// POST /api/v1/feed-log/{id}/approve - Mark a feed item reviewed.
async fn approve_feed(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, AppError> {
    seed(&state);
    state
        .feeds
        .update(&id, |f| {
            f.status = ReviewStatus::Reviewed;
            f.is_new = false;
            f.approved_at = Some(saro_core::now());
        })
        .ok_or_else(|| AppError::not_found("Feed item"))?;
    tracing::info!(feed_id = %id, "feed item approved");
    Ok(Json(json!({ "approved": true, "feed_id": id })))
}
