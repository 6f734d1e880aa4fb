//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented handlers into a single OpenAPI 3.1
//! document served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the documented API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SARO API: AI Regulatory Intelligence",
        version = "4.0.0",
        description = "Regulatory ingestion and forecasting, model audits, enterprise tenants, agentic guardrails, autonomous bots, compliance marketplace, and ethics scans."
    ),
    paths(
        // Health
        crate::routes::health::health_check,
        // MVP1
        crate::routes::ingestion::ingest_document,
        crate::routes::ingestion::list_documents,
        crate::routes::ingestion::get_document,
        // MVP2
        crate::routes::audit::run_audit,
        crate::routes::audit::list_audits,
        crate::routes::audit::get_audit,
        crate::routes::audit::evaluate_policy,
        crate::routes::audit::audit_log,
        // MVP3
        crate::routes::enterprise::create_tenant,
        // MVP4
        crate::routes::guardrails::check_guardrails,
        crate::routes::compliance::generate_report,
        crate::routes::compliance::list_regulations,
        // MVP5
        crate::routes::bots::execute_bot,
        crate::routes::marketplace::purchase_model,
        // Checklists and policy library
        crate::routes::model_output::upload_model_output,
        crate::routes::policies::upload_policy,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::health::HealthReport,
        // Records
        crate::state::ActivityEntry,
        crate::state::DocumentRecord,
        crate::state::AuditRecord,
        crate::state::UsageCounters,
        crate::state::TenantRecord,
        crate::state::UploadRecord,
        crate::state::PolicyRecord,
        crate::state::FeedRecord,
        crate::state::ListingRecord,
        crate::state::TransactionRecord,
        crate::state::BotJobRecord,
        // Request/response DTOs
        crate::routes::ingestion::IngestDocumentRequest,
        crate::routes::audit::AuditRequest,
        crate::routes::audit::PolicyEvaluateRequest,
        crate::routes::audit::PolicyEvaluation,
        crate::routes::audit::AuditLogResponse,
        crate::routes::enterprise::CreateTenantRequest,
        crate::routes::guardrails::GuardrailCheckRequest,
        crate::routes::guardrails::GuardrailCheckResponse,
        crate::routes::compliance::GenerateReportRequest,
        crate::routes::compliance::ComplianceReport,
        crate::routes::compliance::Regulation,
        crate::routes::compliance::RegulationCatalogue,
        crate::routes::bots::ExecuteBotRequest,
        crate::routes::marketplace::PurchaseRequest,
        crate::routes::model_output::UploadModelOutputRequest,
        crate::routes::policies::UploadPolicyRequest,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "mvp1", description = "Regulatory ingestion and forecasting"),
        (name = "mvp2", description = "Model audits and policy evaluation"),
        (name = "mvp3", description = "Enterprise tenants"),
        (name = "mvp4", description = "Guardrails and compliance reporting"),
        (name = "mvp5", description = "Autonomous bots and marketplace"),
        (name = "model-output", description = "Model output checklists"),
        (name = "policies", description = "Policy library"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json - Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_guardrail_check() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/mvp4/guardrails/check"));
        assert!(doc.paths.paths.contains_key("/api/v1/mvp2/audits/{id}"));
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(json["info"]["title"], "SARO API: AI Regulatory Intelligence");
    }
}
