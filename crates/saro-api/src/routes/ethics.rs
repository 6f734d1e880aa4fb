//! # MVP5: Ethics & Surveillance Risk
//!
//! Scans a system description for surveillance capabilities prohibited by
//! EU AI Act Article 5 and generates DPIA outlines.

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use saro_core::{IdPrefix, RecordId};
use saro_rules::SurveillanceScan;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

const PENALTY: &str = "€30M or 6% global turnover";

/// (category, description)
const PROHIBITED_USES: [(&str, &str); 6] = [
    (
        "Biometric Categorisation",
        "Using biometrics to infer race, political opinions, religious beliefs, sexual orientation",
    ),
    (
        "Social Scoring",
        "AI systems scoring people based on social behaviour by public authorities",
    ),
    (
        "Real-time Remote Biometric ID",
        "Real-time remote biometric identification in public spaces for law enforcement",
    ),
    (
        "Emotion Recognition",
        "AI inferring emotions of natural persons in workplace or education",
    ),
    (
        "Manipulation",
        "AI using subliminal techniques or exploiting vulnerabilities to distort behaviour",
    ),
    (
        "Predictive Policing",
        "Risk assessments for criminal offences based solely on profiling",
    ),
];

/// (title, status, notes)
const DPIA_SECTIONS: [(&str, &str, &str); 6] = [
    ("1. Description of Processing", "complete", "Automated based on system description"),
    ("2. Necessity & Proportionality", "complete", "Assessment against GDPR Art. 5 principles"),
    ("3. Risk to Rights & Freedoms", "complete", "Identified risks to data subjects"),
    ("4. Measures to Address Risk", "complete", "Technical and organisational measures"),
    ("5. DPO Consultation", "required", "Must be reviewed by Data Protection Officer"),
    (
        "6. Supervisory Authority Consultation",
        "conditional",
        "Required if residual risk remains high",
    ),
];

/// System description to scan. `description` wins over `text`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SurveillanceScanRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub system_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SurveillanceScanResponse {
    pub scan_id: String,
    pub system_name: String,
    #[serde(flatten)]
    pub scan: SurveillanceScan,
    pub scanned_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DpiaRequest {
    #[serde(default)]
    pub system_name: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
}

/// Build the ethics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp5/ethics/surveillance-scan", post(surveillance_scan))
        .route("/api/v1/mvp5/ethics/prohibited-use-cases", get(prohibited_use_cases))
        .route("/api/v1/mvp5/ethics/dpia-generate", post(generate_dpia))
}

/// POST /api/v1/mvp5/ethics/surveillance-scan - Scan a system for surveillance risks.
async fn surveillance_scan(
    body: Result<Json<SurveillanceScanRequest>, JsonRejection>,
) -> Result<Json<SurveillanceScanResponse>, AppError> {
    let req = extract_json(body)?;
    let text = req.description.or(req.text).unwrap_or_default();
    let scan = saro_rules::surveillance_scan(&text);
    let scan_id = RecordId::generate(IdPrefix::Scan).into_string();

    if scan.eu_ai_act_prohibited {
        tracing::warn!(scan_id = %scan_id, findings = scan.findings_count, "prohibited surveillance capability");
    } else {
        tracing::info!(scan_id = %scan_id, findings = scan.findings_count, "surveillance scan complete");
    }

    Ok(Json(SurveillanceScanResponse {
        scan_id,
        system_name: req.system_name.unwrap_or_else(|| "unnamed-system".to_string()),
        scan,
        scanned_at: saro_core::now(),
    }))
}

/// GET /api/v1/mvp5/ethics/prohibited-use-cases - EU AI Act Article 5 catalogue.
async fn prohibited_use_cases() -> Json<Value> {
    let prohibited: Vec<Value> = PROHIBITED_USES
        .iter()
        .map(|(category, description)| {
            json!({ "category": category, "description": description, "penalty": PENALTY })
        })
        .collect();
    Json(json!({
        "source": "EU AI Act Article 5",
        "effective_date": "2024-08-01",
        "prohibited": prohibited,
    }))
}

/// POST /api/v1/mvp5/ethics/dpia-generate - Outline a Data Protection Impact Assessment.
async fn generate_dpia(body: Result<Json<DpiaRequest>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let req = extract_json(body)?;
    let sections: Vec<Value> = DPIA_SECTIONS
        .iter()
        .map(|(title, status, notes)| json!({ "title": title, "status": status, "notes": notes }))
        .collect();
    Ok(Json(json!({
        "dpia_id": RecordId::generate(IdPrefix::Dpia).into_string(),
        "system_name": req.system_name.unwrap_or_else(|| "unnamed".to_string()),
        "sections": sections,
        "risk_level": req.risk_level.unwrap_or_else(|| "high".to_string()),
        "dpa_consultation_required": true,
        "generated_at": saro_core::now(),
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
    async fn social_scoring_is_prohibited() {
        let (_, body) = post_json(
            app(),
            "/api/v1/mvp5/ethics/surveillance-scan",
            json!({ "system_name": "CityWatch", "description": "Social scoring of residents" }),
        )
        .await;
        assert!(body["scan_id"].as_str().unwrap().starts_with("ETH-"));
        assert_eq!(body["system_name"], "CityWatch");
        assert_eq!(body["overall_risk"], "PROHIBITED");
        assert_eq!(body["compliance_verdict"], "NON_COMPLIANT");
        assert_eq!(body["findings"][0]["risk_type"], "Mass Surveillance");
    }

    #[tokio::test]
    async fn text_field_is_accepted() {
        let (_, body) = post_json(
            app(),
            "/api/v1/mvp5/ethics/surveillance-scan",
            json!({ "text": "weather forecasting" }),
        )
        .await;
        assert_eq!(body["overall_risk"], "LOW");
        assert_eq!(body["system_name"], "unnamed-system");
        assert_eq!(body["requires_dpia"], false);
    }

    #[tokio::test]
    async fn prohibited_catalogue_and_dpia() {
        let (_, body) = get_json(app(), "/api/v1/mvp5/ethics/prohibited-use-cases").await;
        assert_eq!(body["prohibited"].as_array().unwrap().len(), 6);

        let (_, dpia) = post_json(app(), "/api/v1/mvp5/ethics/dpia-generate", json!({})).await;
        assert!(dpia["dpia_id"].as_str().unwrap().starts_with("DPIA-"));
        assert_eq!(dpia["risk_level"], "high");
        assert_eq!(dpia["sections"][4]["status"], "required");
    }
}
