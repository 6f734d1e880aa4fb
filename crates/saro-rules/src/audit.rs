//! # Model Audit
//!
//! Selects canned findings by use case, derives an overall risk level and
//! compliance status, and lists the regulations that apply in a
//! jurisdiction.

use rand::Rng;
use saro_core::{round_to, uniform, ComplianceStatus, RiskLevel};
use serde::{Deserialize, Serialize};

/// A single audit finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: String,
    pub finding: String,
    pub severity: RiskLevel,
}

fn finding(category: &str, text: &str, severity: RiskLevel) -> Finding {
    Finding {
        category: category.to_string(),
        finding: text.to_string(),
        severity,
    }
}

/// Regulations applicable in `jurisdiction`; unknown regions use the EU list.
pub fn applicable_regulations(jurisdiction: &str) -> Vec<String> {
    let list: &[&str] = match jurisdiction {
        "US" => &["NIST AI RMF", "FTC AI Guidelines", "EEOC AI Guidance"],
        "UK" => &["UK AI Whitepaper", "ICO AI Guidance"],
        "APAC" => &["MAS TREx", "PDPC AI Framework", "China AI Regulation"],
        _ => &["EU AI Act", "GDPR", "AI Liability Directive"],
    };
    list.iter().map(|s| (*s).to_string()).collect()
}

fn findings_for(key: &str) -> Vec<Finding> {
    use RiskLevel::*;
    match key {
        "healthcare" => vec![
            finding("Safety", "Insufficient clinical validation dataset size", High),
            finding("Transparency", "Model explainability not meeting SHAP threshold", Medium),
            finding("Data Quality", "Training data demographic imbalance detected", High),
        ],
        "finance" => vec![
            finding("Bias", "Protected attribute proxy correlation found", High),
            finding("Accountability", "Audit trail gaps in decision logging", Medium),
            finding("Transparency", "Adverse action explanation insufficient", High),
        ],
        "hr" => vec![
            finding("Bias", "Gender bias detected in resume ranking", Critical),
            finding("Compliance", "EEOC disparate impact threshold exceeded", Critical),
        ],
        _ => vec![
            finding("Documentation", "Technical documentation incomplete", Low),
            finding("Monitoring", "Post-deployment monitoring not configured", Medium),
        ],
    }
}

/// Findings for every use-case family named in `use_case`.
pub fn select_findings(use_case: &str) -> Vec<Finding> {
    let lowered = use_case.to_lowercase();
    let found: Vec<Finding> = ["healthcare", "finance", "hr"]
        .into_iter()
        .filter(|k| lowered.contains(k))
        .flat_map(findings_for)
        .collect();
    if found.is_empty() {
        findings_for("default")
    } else {
        found
    }
}

/// Overall risk and status from the worst finding and the compliance score.
pub fn classify(findings: &[Finding], compliance_score: f64) -> (RiskLevel, ComplianceStatus) {
    match findings.iter().map(|f| f.severity).max().unwrap_or(RiskLevel::Low) {
        RiskLevel::Critical => (RiskLevel::Critical, ComplianceStatus::NonCompliant),
        RiskLevel::High => (RiskLevel::High, ComplianceStatus::Review),
        _ if compliance_score > 0.8 => (RiskLevel::Low, ComplianceStatus::Compliant),
        _ => (RiskLevel::Medium, ComplianceStatus::Pending),
    }
}

/// Outcome of an audit before it is stamped with an id and dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditAssessment {
    pub overall_risk: RiskLevel,
    pub compliance_score: f64,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub applicable_regulations: Vec<String>,
    pub status: ComplianceStatus,
}

/// Audit a model deployed for `use_case` in `jurisdiction`.
pub fn assess<R: Rng + ?Sized>(rng: &mut R, use_case: &str, jurisdiction: &str) -> AuditAssessment {
    let findings = select_findings(use_case);
    let compliance_score = round_to(uniform(rng, 0.55, 0.92), 3);
    let (overall_risk, status) = classify(&findings, compliance_score);
    let regulations = applicable_regulations(jurisdiction);
    let primary = regulations.first().map(String::as_str).unwrap_or("EU AI Act");
    let recommendations = vec![
        format!("Implement bias testing suite for {use_case} context"),
        "Establish human oversight mechanisms for high-risk decisions".to_string(),
        "Deploy real-time monitoring with drift detection".to_string(),
        format!("Document model card per {primary} Article 11 requirements"),
        "Schedule quarterly re-audit with updated test datasets".to_string(),
    ];
    AuditAssessment {
        overall_risk,
        compliance_score,
        findings,
        recommendations,
        applicable_regulations: regulations,
        status,
    }
}
