//! # MVP3: Enterprise Suite
//!
//! Tenant provisioning, high-availability status, third-party
//! integrations and the enterprise and executive dashboards.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use saro_core::{now, ApiKeyKind, IdPrefix, RecordId};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::{AppState, TenantRecord, UsageCounters};

/// Tenant limits granted on every plan.
const DEFAULT_LIMITS: UsageCounters = UsageCounters {
    api_calls: 50_000,
    audits: 100,
    reports: 500,
};

/// Request to provision a tenant. Every field is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTenantRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub jurisdictions: Option<Vec<String>>,
}

/// Build the enterprise router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp3/tenants", get(list_tenants).post(create_tenant))
        .route("/api/v1/mvp3/ha-status", get(ha_status))
        .route("/api/v1/mvp3/integrations", get(integrations))
        .route("/api/v1/mvp3/dashboard/enterprise", get(enterprise_dashboard))
        .route("/api/v1/mvp3/dashboard/executive", get(executive_dashboard))
}

/// POST /api/v1/mvp3/tenants - Provision an enterprise tenant.
#[utoipa::path(
    post,
    path = "/api/v1/mvp3/tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 200, description = "Tenant provisioned", body = TenantRecord),
    ),
    tag = "mvp3"
)]
pub(crate) async fn create_tenant(
    State(state): State<AppState>,
    body: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> Result<Json<TenantRecord>, AppError> {
    let req = extract_json(body)?;
    let tenant_id = RecordId::generate(IdPrefix::Tenant).into_string();
    let tenant = TenantRecord {
        tenant_id: tenant_id.clone(),
        name: req.name.unwrap_or_else(|| "Unknown Org".to_string()),
        plan: req.plan.unwrap_or_else(|| "professional".to_string()),
        api_key: ApiKeyKind::Tenant.issue(),
        status: "active".to_string(),
        industry: req.industry.unwrap_or_else(|| "technology".to_string()),
        jurisdictions: req
            .jurisdictions
            .unwrap_or_else(|| vec!["EU".to_string(), "US".to_string()]),
        created_at: now(),
        monthly_usage: UsageCounters {
            api_calls: 0,
            audits: 0,
            reports: 0,
        },
        limits: DEFAULT_LIMITS,
    };
    state.tenants.insert(tenant_id.clone(), tenant.clone());
    tracing::info!(tenant_id = %tenant_id, plan = %tenant.plan, "tenant provisioned");
    Ok(Json(tenant))
}

/// GET /api/v1/mvp3/tenants - Demo tenants followed by provisioned tenants.
async fn list_tenants(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let demo = [
        ("TEN-DEMO0001", "Deloitte AI Practice", "enterprise", "consulting", (41_230, 89, 234)),
        ("TEN-DEMO0002", "FinServ Bank AG", "professional", "finance", (18_400, 45, 112)),
        ("TEN-DEMO0003", "HealthCo Systems", "professional", "healthcare", (9_300, 22, 67)),
    ];
    let mut tenants: Vec<Value> = demo
        .iter()
        .map(|(id, name, plan, industry, (api_calls, audits, reports))| {
            json!({
                "tenant_id": id,
                "name": name,
                "plan": plan,
                "status": "active",
                "industry": industry,
                "monthly_usage": { "api_calls": api_calls, "audits": audits, "reports": reports },
            })
        })
        .collect();
    for tenant in state.tenants.list() {
        tenants.push(serde_json::to_value(tenant).map_err(saro_core::SaroError::from)?);
    }
    Ok(Json(tenants))
}

/// GET /api/v1/mvp3/ha-status - Multi-region deployment status.
async fn ha_status() -> Json<Value> {
    Json(json!({
        "deployment": "multi-region-active-active",
        "regions": ["eu-west-1", "us-east-1", "ap-southeast-1"],
        "uptime_sla": "99.99%",
        "actual_uptime_30d": "99.97%",
        "failover_time_ms": 450,
        "load_balancer": "healthy",
        "replicas": { "eu-west-1": 3, "us-east-1": 3, "ap-southeast-1": 2 },
        "last_incident": null,
    }))
}

/// GET /api/v1/mvp3/integrations - Connected third-party systems.
async fn integrations() -> Json<Value> {
    let available = [
        ("ServiceNow", "connected", "itsm", "15min"),
        ("Jira", "connected", "project_mgmt", "5min"),
        ("Slack", "connected", "notifications", "realtime"),
        ("Microsoft Teams", "connected", "notifications", "realtime"),
        ("SAP GRC", "pending", "grc", "1hour"),
        ("AWS Security Hub", "connected", "security", "5min"),
    ];
    let available: Vec<Value> = available
        .iter()
        .map(|(name, status, kind, sync)| {
            json!({ "name": name, "status": status, "type": kind, "sync_interval": sync })
        })
        .collect();
    Json(json!({
        "available": available,
        "webhooks_active": 7,
        "api_integrations": 4,
    }))
}

/// GET /api/v1/mvp3/dashboard/enterprise - Commercial health of the tenant base.
async fn enterprise_dashboard(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "tenant_count": state.tenants.len() + 20,
        "mrr_usd": 87400,
        "arr_usd": 1048800,
        "churn_rate": 0.02,
        "nps_score": 67,
        "active_users_30d": 284,
        "compliance_coverage": {
            "EU AI Act": 0.91,
            "GDPR": 0.96,
            "NIST AI RMF": 0.88,
            "HIPAA": 0.84,
        },
        "support_tickets_open": 3,
        "sla_adherence": 0.994,
    }))
}

/// GET /api/v1/mvp3/dashboard/executive - Board-level compliance summary.
async fn executive_dashboard() -> Json<Value> {
    Json(json!({
        "overall_compliance": 92.4,
        "risk_exposure": "Low",
        "regulatory_coverage": 30,
        "models_audited": 47,
        "cost_avoidance_usd": 2400000,
        "remediation_velocity": "3.2 days avg",
        "board_ready_score": 94,
        "soc2_readiness": 100,
        "quarterly_trend": [88.1, 89.7, 91.2, 92.4],
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
    async fn tenant_defaults_applied() {
        let state = AppState::new();
        let (status, body) = post_json(app(&state), "/api/v1/mvp3/tenants", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["tenant_id"].as_str().unwrap().starts_with("TEN-"));
        assert_eq!(body["name"], "Unknown Org");
        assert_eq!(body["plan"], "professional");
        assert!(body["api_key"].as_str().unwrap().starts_with("saro-"));
        assert_eq!(body["jurisdictions"], json!(["EU", "US"]));
        assert_eq!(body["limits"]["api_calls"], 50000);
    }

    #[tokio::test]
    async fn created_tenants_follow_demo_tenants() {
        let state = AppState::new();
        post_json(app(&state), "/api/v1/mvp3/tenants", json!({ "name": "Acme" })).await;
        let (_, body) = get_json(app(&state), "/api/v1/mvp3/tenants").await;
        let tenants = body.as_array().unwrap();
        assert_eq!(tenants.len(), 4);
        assert_eq!(tenants[0]["tenant_id"], "TEN-DEMO0001");
        assert_eq!(tenants[3]["name"], "Acme");

        let (_, dash) = get_json(app(&state), "/api/v1/mvp3/dashboard/enterprise").await;
        assert_eq!(dash["tenant_count"], 21);
    }

    #[tokio::test]
    async fn integrations_listed() {
        let state = AppState::new();
        let (_, body) = get_json(app(&state), "/api/v1/mvp3/integrations").await;
        assert_eq!(body["available"].as_array().unwrap().len(), 6);
        assert_eq!(body["available"][4]["status"], "pending");
    }
}
