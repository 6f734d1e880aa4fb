//! # Persona Workflows & Platform Checklist

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use saro_core::{Severity, Verdict};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickStartStep {
    pub step: u8,
    pub action: &'static str,
    pub detail: &'static str,
}

/// Guided workflow for a persona.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PersonaWorkflow {
    pub primary_actions: [&'static str; 4],
    pub key_metrics: [&'static str; 4],
    pub recommended_modules: [&'static str; 3],
    pub quick_start: [QuickStartStep; 3],
}

const fn step(step: u8, action: &'static str, detail: &'static str) -> QuickStartStep {
    QuickStartStep { step, action, detail }
}

const FORECASTER: PersonaWorkflow = PersonaWorkflow {
    primary_actions: [
        "Ingest Regulatory Feed",
        "Run Forecast Simulation",
        "Review New Alerts",
        "Export Risk Report",
    ],
    key_metrics: ["forecast_accuracy", "new_regulations_today", "upcoming_deadlines", "risk_trend"],
    recommended_modules: ["Ingestion & Forecast", "Regulatory Feed", "Policy Library"],
    quick_start: [
        step(1, "Go to Ingestion & Forecast", "Ingest today's regulatory updates"),
        step(2, "Check Regulatory Feed", "Approve new feed items from EUR-Lex and NIST"),
        step(3, "Run 90-day forecast", "Identify upcoming EU AI Act obligations"),
    ],
};

const AUTOPSIER: PersonaWorkflow = PersonaWorkflow {
    primary_actions: [
        "Run Model Audit",
        "Generate Standards Report",
        "Review Findings",
        "Export Evidence Chain",
    ],
    key_metrics: ["audits_this_week", "critical_findings", "avg_compliance_score", "open_gaps"],
    recommended_modules: ["Audit & Compliance", "Audit Reports", "Model Output Checker"],
    quick_start: [
        step(1, "Upload Model Output", "Run checklist against EU AI Act benchmarks"),
        step(2, "Go to Audit & Compliance", "Run full compliance audit for your AI model"),
        step(3, "Generate Standards Report", "Export EU AI Act / NIST aligned report"),
    ],
};

const ENABLER: PersonaWorkflow = PersonaWorkflow {
    primary_actions: [
        "Trigger Bot Remediation",
        "Upload Policy",
        "Check Guardrails",
        "Review Pending Policies",
    ],
    key_metrics: [
        "bots_active",
        "policies_pending_review",
        "guardrail_blocks_today",
        "remediations_completed",
    ],
    recommended_modules: ["Autonomous Governance", "Policy Library", "Agentic Guardrails"],
    quick_start: [
        step(1, "Check Guardrails", "Test your AI outputs for bias, PII, hallucinations"),
        step(2, "Trigger Remediation Bot", "Auto-fix detected compliance gaps"),
        step(3, "Upload Policy for Analysis", "Analyze custom policy documents for risk"),
    ],
};

const EVANGELIST: PersonaWorkflow = PersonaWorkflow {
    primary_actions: [
        "View Executive Dashboard",
        "Export ROI Report",
        "Review Ethics Scan",
        "Monitor Certifications",
    ],
    key_metrics: ["compliance_score", "fines_avoided_usd", "certification_count", "nps_score"],
    recommended_modules: ["Overview", "Audit Reports", "Ethics & Surveillance"],
    quick_start: [
        step(1, "Review Platform Overview", "Check compliance scores and ROI metrics"),
        step(2, "Run Ethics Scan", "Scan AI systems for surveillance/prohibited risks"),
        step(3, "Export Board Report", "Generate executive PDF with ROI breakdown"),
    ],
};

/// Workflow for `persona_id`; unknown personas get the enabler workflow.
pub fn workflow(persona_id: &str) -> PersonaWorkflow {
    match persona_id {
        "forecaster" => FORECASTER,
        "autopsier" => AUTOPSIER,
        "evangelist" => EVANGELIST,
        _ => ENABLER,
    }
}

/// (module, check, status, detail)
const STATUS_ITEMS: [(&str, &str, Severity, &str); 10] = [
    ("Ingestion", "RSS feeds active", Severity::Pass, "6 feeds polled, 3 new items"),
    ("Ingestion", "Document library current", Severity::Pass, "1,247 docs, last updated 12min ago"),
    ("Audit", "No unreviewed critical findings", Severity::Warn, "2 critical findings pending review"),
    ("Audit", "All models audited this quarter", Severity::Pass, "23 models, all audited"),
    ("Guardrails", "Guardrails operational", Severity::Pass, "< 1ms latency, 96.2% block rate"),
    ("Guardrails", "Bias threshold within bounds", Severity::Warn, "CreditScorer-v2 at 17.3% (limit 15%)"),
    ("Policies", "No flagged policies pending", Severity::Critical, "FDA SaMD policy flagged, needs review"),
    ("Policies", "Feed log reviewed", Severity::Warn, "3 feed items pending approval"),
    ("Bots", "Bot fleet operational", Severity::Pass, "4/4 bots active, 247 actions today"),
    ("Reports", "Standards reports generated", Severity::Pass, "Last report: EU AI Act compliant"),
];

/// Build the checklist router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/checklist/persona/{persona_id}", get(persona_workflow))
        .route("/api/v1/checklist/compliance-status", get(compliance_status))
}

/// GET /api/v1/checklist/persona/{persona_id} - Guided workflow for a persona.
async fn persona_workflow(Path(persona_id): Path<String>) -> Json<Value> {
    Json(json!({
        "workflow": workflow(&persona_id),
        "persona_id": persona_id,
        "generated_at": saro_core::now(),
    }))
}

/// GET /api/v1/checklist/compliance-status - Cross-module platform self-check.
async fn compliance_status() -> Json<Value> {
    let items: Vec<Value> = STATUS_ITEMS
        .iter()
        .map(|(module, check, status, detail)| {
            json!({ "module": module, "check": check, "status": status, "detail": detail })
        })
        .collect();
    Json(json!({
        "generated_at": saro_core::now(),
        "overall_verdict": Verdict::from_severities(STATUS_ITEMS.iter().map(|i| i.2)),
        "items": items,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_util::get_json;

    fn app() -> Router {
        router().with_state(AppState::new())
    }

    #[tokio::test]
    async fn known_persona_workflow() {
        let (_, body) = get_json(app(), "/api/v1/checklist/persona/forecaster").await;
        assert_eq!(body["persona_id"], "forecaster");
        assert_eq!(body["workflow"]["primary_actions"][0], "Ingest Regulatory Feed");
        assert_eq!(body["workflow"]["quick_start"][2]["step"], 3);
    }

    #[tokio::test]
    async fn unknown_persona_falls_back_to_enabler() {
        let (_, body) = get_json(app(), "/api/v1/checklist/persona/astronaut").await;
        assert_eq!(body["persona_id"], "astronaut");
        assert_eq!(body["workflow"]["primary_actions"][0], "Trigger Bot Remediation");
    }

    #[tokio::test]
    async fn status_checklist_fails_on_flagged_policy() {
        let (_, body) = get_json(app(), "/api/v1/checklist/compliance-status").await;
        assert_eq!(body["items"].as_array().unwrap().len(), 10);
        assert_eq!(body["items"][6]["status"], "critical");
        assert_eq!(body["overall_verdict"], "FAIL");
    }
}
