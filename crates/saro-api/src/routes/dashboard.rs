//! # Cross-MVP Dashboard
//!
//! Headline metrics for every MVP, the model × regulation risk heatmap,
//! and the open regulatory alerts.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use saro_core::{minutes_before, now};
use serde_json::{json, Value};

use crate::routes::health::PLATFORM_VERSION;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/dashboard/risk-heatmap", get(risk_heatmap))
        .route("/api/v1/alerts", get(alerts))
}

/// GET /api/v1/dashboard - Unified dashboard metrics across all MVPs.
async fn dashboard() -> Json<Value> {
    let now = now();
    let activity = [
        (2, "New EU AI Act document ingested", "ingestion", "info"),
        (8, "High-risk audit flagged: HealthCo credit model", "audit", "warning"),
        (15, "Guardrail blocked PII exposure attempt", "guardrail", "critical"),
        (23, "New tenant onboarded: FinServ Bank AG", "commercial", "info"),
        (41, "Compliance report generated for FDA 510(k)", "compliance", "info"),
        (57, "NIST AI RMF 2.0 update detected", "forecast", "warning"),
    ];
    let recent_activity: Vec<Value> = activity
        .iter()
        .map(|(minutes, event, kind, severity)| {
            json!({
                "time": minutes_before(now, *minutes),
                "event": event,
                "type": kind,
                "severity": severity,
            })
        })
        .collect();

    Json(json!({
        "generated_at": now,
        "platform_version": PLATFORM_VERSION,
        "mvp1_ingestion": {
            "documents_total": 1247,
            "documents_today": 34,
            "avg_risk_score": 0.54,
            "high_risk_docs": 89,
            "jurisdictions_covered": 8,
            "forecast_accuracy": 0.87,
        },
        "mvp2_audit": {
            "audits_total": 847,
            "audits_this_month": 124,
            "avg_compliance_score": 0.73,
            "non_compliant_models": 23,
            "pending_reviews": 11,
            "regulations_tracked": 30,
        },
        "mvp3_enterprise": {
            "active_tenants": 20,
            "mrr_usd": 87400,
            "api_calls_today": 184200,
            "uptime_percent": 99.97,
            "integrations_active": 5,
            "support_sla_adherence": 0.994,
        },
        "mvp4_agentic": {
            "guardrail_checks_today": 48291,
            "block_rate": 0.038,
            "harmful_block_rate": 0.962,
            "avg_guardrail_latency_ms": 0.8,
            "reports_generated": 234,
            "certifications_issued": 1247,
        },
        "system_health": {
            "api": "operational",
            "database": "operational",
            "redis": "operational",
            "guardrails": "operational",
            "blockchain": "operational",
        },
        "recent_activity": recent_activity,
        "active_alerts": [
            {
                "id": "ALT-001",
                "regulation": "EU AI Act",
                "severity": "high",
                "title": "Enforcement deadline in 45 days",
                "deadline": now + chrono::Duration::days(45),
            },
            {
                "id": "ALT-002",
                "regulation": "UK AI Bill",
                "severity": "medium",
                "title": "New legislation passed second reading",
                "deadline": null,
            },
            {
                "id": "ALT-003",
                "regulation": "NIST AI RMF",
                "severity": "low",
                "title": "Framework v2.0 public comment period open",
                "deadline": now + chrono::Duration::days(30),
            },
        ],
    }))
}

/// GET /api/v1/dashboard/risk-heatmap - Risk scores per model and regulation.
async fn risk_heatmap(State(state): State<AppState>) -> Json<saro_rules::forecast::RiskHeatmap> {
    Json(state.with_rng(saro_rules::forecast::risk_heatmap))
}

/// GET /api/v1/alerts - Open regulatory alerts.
async fn alerts() -> Json<Value> {
    Json(json!({
        "alerts": [
            {
                "id": "a-001",
                "severity": "high",
                "message": "EU AI Act Article 13 deadline in 14 days",
                "regulation": "EU-AI-ACT",
                "created": "2026-02-25",
            },
            {
                "id": "a-002",
                "severity": "medium",
                "message": "Model risk-003 compliance score dropped below 80%",
                "regulation": "NIST-RMF",
                "created": "2026-02-26",
            },
            {
                "id": "a-003",
                "severity": "low",
                "message": "New NIST AI RMF guidance published",
                "regulation": "NIST-RMF",
                "created": "2026-02-27",
            },
        ]
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
    async fn dashboard_has_every_mvp() {
        let (_, body) = get_json(app(), "/api/v1/dashboard").await;
        for key in ["mvp1_ingestion", "mvp2_audit", "mvp3_enterprise", "mvp4_agentic"] {
            assert!(body[key].is_object(), "missing {key}");
        }
        assert_eq!(body["recent_activity"].as_array().unwrap().len(), 6);
        assert!(body["active_alerts"][1]["deadline"].is_null());
    }

    #[tokio::test]
    async fn heatmap_is_five_by_five() {
        let (_, body) = get_json(app(), "/api/v1/dashboard/risk-heatmap").await;
        let rows = body["heatmap"].as_array().unwrap();
        assert_eq!(rows.len(), 5);
        for row in rows {
            let score = row["GDPR"].as_f64().unwrap();
            assert!((0.3..=1.0).contains(&score));
        }
    }

    #[tokio::test]
    async fn alerts_listed() {
        let (_, body) = get_json(app(), "/api/v1/alerts").await;
        assert_eq!(body["alerts"].as_array().unwrap().len(), 3);
    }
}
