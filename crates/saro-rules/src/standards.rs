//! # Standards-Aligned Audit Reports
//!
//! Maps audit findings onto the controls of a published standard and
//! assembles the executive report regulators receive.
//!
//! A finding maps to a control when the finding's category and the control
//! key contain one another (case-insensitively), so "Data Quality" does not
//! map anywhere while "Bias" maps to the bias control.

use chrono::{DateTime, Utc};
use rand::Rng;
use saro_core::{round_to, uniform, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::audit::Finding;

/// Standards that have a control map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "EU AI Act")]
    EuAiAct,
    #[serde(rename = "NIST AI RMF")]
    NistAiRmf,
    #[serde(rename = "ISO 42001")]
    Iso42001,
}

impl Standard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EuAiAct => "EU AI Act",
            Self::NistAiRmf => "NIST AI RMF",
            Self::Iso42001 => "ISO 42001",
        }
    }

    /// Exact-name lookup with fallback to the EU AI Act.
    pub fn resolve(name: &str) -> Self {
        match name.trim() {
            "NIST AI RMF" => Self::NistAiRmf,
            "ISO 42001" => Self::Iso42001,
            _ => Self::EuAiAct,
        }
    }

    pub fn controls(&self) -> &'static [Control] {
        match self {
            Self::EuAiAct => EU_AI_ACT,
            Self::NistAiRmf => NIST_AI_RMF,
            Self::Iso42001 => ISO_42001,
        }
    }
}

/// One control of a standard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub key: &'static str,
    pub article: &'static str,
    pub requirement: &'static str,
    pub threshold: f64,
}

const fn control(key: &'static str, article: &'static str, requirement: &'static str, threshold: f64) -> Control {
    Control { key, article, requirement, threshold }
}

const EU_AI_ACT: &[Control] = &[
    control("bias", "Art. 10", "Data governance: bias testing evidence required", 0.6),
    control("transparency", "Art. 13", "Transparency obligations: explainability documentation", 0.7),
    control("safety", "Art. 9", "Risk management system: clinical/operational validation", 0.8),
    control("accountability", "Art. 14", "Human oversight mechanisms must be implemented", 0.65),
    control("documentation", "Art. 11", "Technical documentation package required", 0.75),
];

const NIST_AI_RMF: &[Control] = &[
    control("bias", "MAP 2.3", "Bias risks mapped, measured, and mitigated", 0.6),
    control("transparency", "GOV 6.1", "Policies for AI transparency documented", 0.65),
    control("safety", "MANAGE 2.2", "Risk response plans tested and validated", 0.7),
    control("accountability", "GOVERN 1.1", "AI risk governance policies established", 0.6),
    control("documentation", "MAP 1.1", "Privacy and bias harm categories documented", 0.65),
];

const ISO_42001: &[Control] = &[
    control("bias", "A.8.4", "Bias management controls with evidence chain", 0.65),
    control("transparency", "A.6.2", "Objectives for AI transparency established", 0.6),
    control("safety", "A.9.3", "Operational planning and control measures", 0.75),
    control("accountability", "A.5.2", "Roles and responsibilities for AI governance", 0.6),
    control("documentation", "A.6.1", "AI system documentation and records", 0.65),
];

/// Status of a mapped control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    Compliant,
    GapIdentified,
}

/// A finding mapped onto a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsMapping {
    pub finding_category: String,
    pub finding: String,
    pub standard: Standard,
    pub article: String,
    pub requirement: String,
    pub compliance_score: f64,
    pub status: ControlStatus,
    pub evidence_available: bool,
}

/// Map findings onto the controls of `standard`, scoring each mapping.
pub fn build_standards_mapping<R: Rng + ?Sized>(
    rng: &mut R,
    findings: &[Finding],
    standard: Standard,
) -> Vec<StandardsMapping> {
    let mut out = Vec::new();
    for f in findings {
        let cat = f.category.to_lowercase();
        for c in standard.controls() {
            if !(c.key.contains(cat.as_str()) || cat.contains(c.key)) {
                continue;
            }
            let score = round_to(uniform(rng, 0.55, 0.97), 2);
            let met = score >= c.threshold;
            out.push(StandardsMapping {
                finding_category: f.category.clone(),
                finding: f.finding.clone(),
                standard,
                article: c.article.to_string(),
                requirement: c.requirement.to_string(),
                compliance_score: score,
                status: if met {
                    ControlStatus::Compliant
                } else {
                    ControlStatus::GapIdentified
                },
                evidence_available: met,
            });
        }
    }
    out
}

/// Findings used when a report request carries none.
pub fn default_findings() -> Vec<Finding> {
    vec![
        Finding {
            category: "Bias".into(),
            finding: "Protected attribute correlation detected".into(),
            severity: RiskLevel::High,
        },
        Finding {
            category: "Transparency".into(),
            finding: "Model explainability below threshold".into(),
            severity: RiskLevel::Medium,
        },
        Finding {
            category: "Documentation".into(),
            finding: "Technical docs incomplete".into(),
            severity: RiskLevel::Medium,
        },
    ]
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub overall_compliance_score: f64,
    pub mitigation_percent: u32,
    pub estimated_fine_avoided_usd: u32,
    pub total_findings: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub report_id: String,
    pub model_name: String,
    pub standard: Standard,
    pub sector: String,
    pub jurisdiction: String,
    pub generated_at: DateTime<Utc>,
    pub generation_time_seconds: f64,
    pub executive_summary: ExecutiveSummary,
    pub standards_mapping: Vec<StandardsMapping>,
    pub gaps_identified: usize,
    pub compliant_controls: usize,
    pub recommendations: Vec<String>,
    pub evidence_chain: Vec<EvidenceEntry>,
    pub ready_for_submission: bool,
}

/// Prior audit result a report can be built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditInput {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub compliance_score: Option<f64>,
    #[serde(default)]
    pub findings: Option<Vec<Finding>>,
}

/// Request for a standards-aligned report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub audit_result: AuditInput,
}

/// Build the report for `req`.
pub fn generate_report<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    report_id: &str,
    req: &ReportRequest,
) -> AuditReport {
    let standard = Standard::resolve(req.standard.as_deref().unwrap_or("EU AI Act"));
    let findings = req
        .audit_result
        .findings
        .clone()
        .unwrap_or_else(default_findings);

    let mapping = build_standards_mapping(rng, &findings, standard);
    let compliance_score = req
        .audit_result
        .compliance_score
        .unwrap_or_else(|| round_to(uniform(rng, 0.65, 0.92), 2));
    let compliant = mapping
        .iter()
        .filter(|m| m.status == ControlStatus::Compliant)
        .count();
    let gaps = mapping.len() - compliant;
    let mitigation_percent = (compliant as f64 / mapping.len().max(1) as f64 * 100.0).round() as u32;
    let fine_avoided: u32 = rng.gen_range(80_000..=350_000);
    let count = |level: RiskLevel| findings.iter().filter(|f| f.severity == level).count();

    let model_name = req
        .audit_result
        .model_name
        .clone()
        .or_else(|| req.model_name.clone())
        .unwrap_or_else(|| "unnamed-model".to_string());
    let std_name = standard.as_str();

    let evidence = |event: String, kind: &str| EvidenceEntry {
        timestamp: now,
        event,
        kind: kind.to_string(),
    };

    AuditReport {
        report_id: report_id.to_string(),
        model_name,
        standard,
        sector: req.sector.clone().unwrap_or_else(|| "general".into()),
        jurisdiction: req.jurisdiction.clone().unwrap_or_else(|| "EU".into()),
        generated_at: now,
        generation_time_seconds: round_to(uniform(rng, 2.1, 4.8), 1),
        executive_summary: ExecutiveSummary {
            overall_compliance_score: compliance_score,
            mitigation_percent,
            estimated_fine_avoided_usd: fine_avoided,
            total_findings: findings.len(),
            critical: count(RiskLevel::Critical),
            high: count(RiskLevel::High),
            medium: count(RiskLevel::Medium),
            low: count(RiskLevel::Low),
        },
        gaps_identified: gaps,
        compliant_controls: compliant,
        standards_mapping: mapping,
        recommendations: vec![
            format!("Implement bias testing suite aligned to {std_name} requirements"),
            "Deploy real-time monitoring with regulatory drift detection".into(),
            "Establish human oversight checkpoints for high-risk decisions".into(),
            format!("Complete technical documentation package per {std_name}"),
            "Schedule quarterly re-audit with updated test datasets".into(),
        ],
        evidence_chain: vec![
            evidence("Audit initiated".into(), "system"),
            evidence(format!("Standards mapping applied: {std_name}"), "analysis"),
            evidence(format!("{} findings processed", findings.len()), "findings"),
            evidence("Report generated and signed".into(), "output"),
        ],
        ready_for_submission: compliance_score >= 0.75,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_findings_map_to_three_controls() {
        let mut rng = StdRng::seed_from_u64(2);
        let m = build_standards_mapping(&mut rng, &default_findings(), Standard::EuAiAct);
        assert_eq!(m.len(), 3);
        assert_eq!(m[0].article, "Art. 10");
        assert_eq!(m[1].article, "Art. 13");
        assert_eq!(m[2].article, "Art. 11");
        for x in &m {
            assert_eq!(x.evidence_available, x.status == ControlStatus::Compliant);
        }
    }

    #[test]
    fn unrelated_category_is_unmapped() {
        let mut rng = StdRng::seed_from_u64(2);
        let f = vec![Finding {
            category: "Data Quality".into(),
            finding: "x".into(),
            severity: RiskLevel::Low,
        }];
        assert!(build_standards_mapping(&mut rng, &f, Standard::Iso42001).is_empty());
    }

    #[test]
    fn report_counts_and_readiness() {
        let mut rng = StdRng::seed_from_u64(8);
        let req = ReportRequest {
            standard: Some("NIST AI RMF".into()),
            audit_result: AuditInput {
                compliance_score: Some(0.74),
                ..Default::default()
            },
            ..Default::default()
        };
        let r = generate_report(&mut rng, saro_core::now(), "RPT-1", &req);
        assert_eq!(r.standard, Standard::NistAiRmf);
        assert_eq!(r.executive_summary.total_findings, 3);
        assert_eq!(r.executive_summary.high, 1);
        assert_eq!(r.executive_summary.medium, 2);
        assert_eq!(r.gaps_identified + r.compliant_controls, r.standards_mapping.len());
        assert!(!r.ready_for_submission);
        assert_eq!(r.evidence_chain.len(), 4);
        assert!((80_000..=350_000).contains(&r.executive_summary.estimated_fine_avoided_usd));
        assert_eq!(r.model_name, "unnamed-model");
    }

    #[test]
    fn unknown_standard_falls_back() {
        assert_eq!(Standard::resolve("SOC 2"), Standard::EuAiAct);
    }
}
