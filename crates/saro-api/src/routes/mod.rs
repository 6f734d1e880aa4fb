//! # API Route Modules
//!
//! One module per feature area. Paths are mounted in full (`/api/v1/...`)
//! by each module's `router()`.
//!
//! - `health` - platform banner, health probes, Prometheus scrape.
//! - `dashboard` - cross-MVP dashboard, risk heatmap, legacy alerts.
//! - `ingestion` - MVP1 document ingestion, forecasts, risk trends.
//! - `audit` - MVP2 model audits, compliance matrix and map, policy
//!   evaluation, audit log, orchestrator.
//! - `enterprise` - MVP3 tenants, HA status, integrations, dashboards.
//! - `guardrails` - MVP4 output guardrail checks.
//! - `compliance` - MVP4 report generation, regulation catalogue,
//!   FDA 510(k) packages, APAC coverage, blockchain verification.
//! - `training` - MVP4 courses and enrollment.
//! - `commercial` - MVP4 onboarding, billing, usage, GA readiness, partners.
//! - `bots` - MVP5 remediation bots.
//! - `marketplace` - MVP5 compliance-stamped model marketplace.
//! - `ethics` - MVP5 surveillance scan, prohibited uses, DPIA.
//! - `agent` - agentic pipeline runs and non-standard document analysis.
//! - `audit_reports` - standards-aligned audit reports.
//! - `model_output` - model output checklists against policy benchmarks.
//! - `policies` - policy library and regulatory feed log.
//! - `checklist` - persona workflows and platform self-check.
//! - `personas` - persona catalogue and onboarding.
//! - `pwa` - web app manifest, offline config, push subscriptions.

pub mod agent;
pub mod audit;
pub mod audit_reports;
pub mod bots;
pub mod checklist;
pub mod commercial;
pub mod compliance;
pub mod dashboard;
pub mod enterprise;
pub mod ethics;
pub mod guardrails;
pub mod health;
pub mod ingestion;
pub mod marketplace;
pub mod model_output;
pub mod personas;
pub mod policies;
pub mod pwa;
pub mod training;

use serde::Deserialize;

/// `?limit=` query parameter shared by listing endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// `?jurisdiction=` filter; `ALL` (the default) disables filtering.
#[derive(Debug, Deserialize)]
pub struct JurisdictionQuery {
    #[serde(default = "all")]
    pub jurisdiction: String,
}

pub(crate) fn all() -> String {
    "ALL".to_string()
}

/// Whether `value` passes an `ALL`-or-exact filter.
pub(crate) fn matches_filter(filter: &str, value: &str) -> bool {
    filter == "ALL" || filter == value
}

#[cfg(test)]
pub(crate) mod test_util {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Send a request and return the status and raw body.
    pub async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Send a request and parse the JSON response.
    pub async fn send_json(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, text) = send(app, method, uri, body).await;
        (status, serde_json::from_str(&text).unwrap())
    }

    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send_json(app, "GET", uri, None).await
    }

    pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send_json(app, "POST", uri, Some(body)).await
    }
}
