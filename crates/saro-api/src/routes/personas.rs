//! # Personas & Client Onboarding

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use saro_core::{ApiKeyKind, IdPrefix, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// A platform persona and the modules it uses most.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub modules: [&'static str; 3],
    pub color: &'static str,
}

pub const PERSONAS: [Persona; 4] = [
    Persona {
        id: "forecaster",
        name: "Forecaster",
        icon: "📈",
        description: "Regulatory intelligence, risk prediction, upcoming regulatory changes",
        modules: ["Ingestion & Forecast", "Regulatory Alerts", "Feed Log"],
        color: "cyan",
    },
    Persona {
        id: "autopsier",
        name: "Autopsier",
        icon: "🔍",
        description: "Deep-dive audit findings, evidence chains, standards-aligned reports",
        modules: ["Audit & Compliance", "Standards Reports", "Evidence Chain"],
        color: "amber",
    },
    Persona {
        id: "enabler",
        name: "Enabler",
        icon: "⚙️",
        description: "Implement controls, manage policies, drive remediation automation",
        modules: ["Guardrails", "Autonomous Bots", "Policy Library"],
        color: "green",
    },
    Persona {
        id: "evangelist",
        name: "Evangelist",
        icon: "🎯",
        description: "Executive summaries, ROI metrics, board reporting, ethics overview",
        modules: ["Executive Dashboard", "Commercial", "Ethics & Surveillance"],
        color: "purple",
    },
];

/// (step, done)
const ONBOARDING_STEPS: [(&str, bool); 6] = [
    ("Account Created", true),
    ("Persona Configured", true),
    ("API Keys Generated", true),
    ("First Document Ingested", false),
    ("First Audit Run", false),
    ("Guardrails Active", false),
];

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OnboardClientRequest {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
}

/// Build the personas router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/personas", get(list_personas))
        .route("/api/v1/onboard", post(onboard_client))
}

/// GET /api/v1/personas - Persona catalogue.
async fn list_personas() -> Json<Value> {
    Json(json!({ "personas": PERSONAS }))
}

/// POST /api/v1/onboard - Onboard a client with keys and a starter checklist.
async fn onboard_client(body: Result<Json<OnboardClientRequest>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let req = extract_json(body)?;
    let tenant_id = RecordId::generate(IdPrefix::Tenant).into_string();
    let persona = req.persona.unwrap_or_else(|| "enabler".to_string());
    let steps: Vec<Value> = ONBOARDING_STEPS
        .iter()
        .map(|(step, done)| json!({ "step": step, "done": done }))
        .collect();
    tracing::info!(tenant_id = %tenant_id, persona = %persona, "client onboarded");

    Ok(Json(json!({
        "tenant_id": tenant_id,
        "company_name": req.company_name,
        "industry": req.industry.unwrap_or_else(|| "technology".to_string()),
        "plan": req.plan.unwrap_or_else(|| "professional".to_string()),
        "persona": persona,
        "api_key": ApiKeyKind::Live.issue(),
        "sandbox_key": ApiKeyKind::Test.issue(),
        "steps": steps,
        "onboarded_at": saro_core::now(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::{get_json, post_json};

    fn app() -> Router {
        router().with_state(AppState::new())
    }

    #[tokio::test]
    async fn four_personas() {
        let (_, body) = get_json(app(), "/api/v1/personas").await;
        let personas = body["personas"].as_array().unwrap();
        assert_eq!(personas.len(), 4);
        assert_eq!(personas[3]["id"], "evangelist");
    }

    #[tokio::test]
    async fn onboarding_defaults() {
        let (_, body) = post_json(app(), "/api/v1/onboard", json!({ "company_name": "Acme" })).await;
        assert!(body["tenant_id"].as_str().unwrap().starts_with("TEN-"));
        assert_eq!(body["company_name"], "Acme");
        assert_eq!(body["persona"], "enabler");
        assert_eq!(body["steps"].as_array().unwrap().len(), 6);
        assert_eq!(body["steps"][3]["done"], false);
    }
}
