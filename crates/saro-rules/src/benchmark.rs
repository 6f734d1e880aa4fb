//! # Model Output Benchmark Checklist
//!
//! Evaluates a customer model's output against a policy benchmark and a
//! domain profile, producing six checklist items mapped to articles:
//!
//! 1. Bias score: critical above 1.5× the threshold, warn above it.
//! 2. Transparency: critical below 0.8× the minimum, warn below it.
//! 3. Accuracy: critical below 0.9× the minimum, warn below it.
//! 4. Human oversight: missing is critical under FDA SaMD, a warning elsewhere.
//! 5. Required output fields: two or more missing is critical, one warns.
//! 6. Protected attributes in the feature set: more than two is critical.

use rand::Rng;
use saro_core::{round_to, uniform, ChecklistSummary, Severity};
use serde::{Deserialize, Serialize};

use crate::policy::{Domain, Policy};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Article reference and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleRef {
    pub reference: &'static str,
    pub title: &'static str,
}

const fn art(reference: &'static str, title: &'static str) -> ArticleRef {
    ArticleRef { reference, title }
}

/// Threshold set and article references for one policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Benchmark {
    pub bias_threshold: f64,
    pub transparency_min: f64,
    pub accuracy_min: f64,
    pub bias: ArticleRef,
    pub transparency: ArticleRef,
    pub accuracy: ArticleRef,
    pub human_oversight: ArticleRef,
    pub documentation: ArticleRef,
}

pub fn benchmark(policy: Policy) -> Benchmark {
    match policy {
        Policy::EuAiAct => Benchmark {
            bias_threshold: 0.15,
            transparency_min: 0.60,
            accuracy_min: 0.80,
            bias: art("Art. 10", "Data Governance & Bias"),
            transparency: art("Art. 13", "Transparency Obligations"),
            accuracy: art("Art. 15", "Accuracy & Robustness"),
            human_oversight: art("Art. 14", "Human Oversight"),
            documentation: art("Art. 11", "Technical Documentation"),
        },
        Policy::NistAiRmf => Benchmark {
            bias_threshold: 0.12,
            transparency_min: 0.65,
            accuracy_min: 0.82,
            bias: art("MAP 2.3", "Bias Risk Mapping"),
            transparency: art("GOV 6.1", "AI Transparency Policies"),
            accuracy: art("MEASURE 2.5", "Performance Measurement"),
            human_oversight: art("GOVERN 1.1", "AI Governance Policies"),
            documentation: art("MAP 1.1", "Privacy & Harm Documentation"),
        },
        Policy::Iso42001 => Benchmark {
            bias_threshold: 0.18,
            transparency_min: 0.55,
            accuracy_min: 0.78,
            bias: art("A.8.4", "Bias Management Controls"),
            transparency: art("A.6.2", "AI Transparency Objectives"),
            accuracy: art("A.9.3", "Operational Control Measures"),
            human_oversight: art("A.5.2", "Roles & Responsibilities"),
            documentation: art("A.6.1", "AI System Documentation"),
        },
        Policy::FdaSamd => Benchmark {
            bias_threshold: 0.10,
            transparency_min: 0.75,
            accuracy_min: 0.90,
            bias: art("510(k) §3.2", "Clinical Validation: Bias"),
            transparency: art("510(k) §4.1", "Explainability for Clinicians"),
            accuracy: art("510(k) §2.1", "Clinical Performance"),
            human_oversight: art("510(k) §5.3", "Clinician Override Mechanism"),
            documentation: art("510(k) §1.0", "Software Documentation"),
        },
    }
}

struct DomainChecks {
    protected_attributes: &'static [&'static str],
    required_fields: &'static [&'static str],
}

fn domain_checks(domain: Domain) -> DomainChecks {
    match domain {
        Domain::Finance => DomainChecks {
            protected_attributes: &["gender", "race", "age", "religion", "nationality"],
            required_fields: &["adverse_action_reason", "decision_confidence", "audit_trail_id"],
        },
        Domain::Healthcare => DomainChecks {
            protected_attributes: &["age", "gender", "ethnicity", "disability"],
            required_fields: &["clinical_confidence", "contraindications_checked", "physician_review"],
        },
        Domain::Hr => DomainChecks {
            protected_attributes: &["gender", "race", "age", "pregnancy", "religion"],
            required_fields: &["selection_reason", "disparate_impact_ratio", "human_review_flag"],
        },
        Domain::General => DomainChecks {
            protected_attributes: &["gender", "race", "age"],
            required_fields: &["confidence_score", "decision_basis"],
        },
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Structured model output submitted for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    #[serde(default)]
    pub bias_score: Option<f64>,
    #[serde(default)]
    pub transparency_score: Option<f64>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub human_oversight: Option<bool>,
    #[serde(default)]
    pub fields_present: Vec<String>,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl ModelOutput {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Keyword heuristics turning a free-text description into structured output.
    pub fn from_text<R: Rng + ?Sized>(rng: &mut R, text: &str) -> Self {
        let t = text.to_lowercase();
        let any = |words: &[&str]| words.iter().any(|w| t.contains(w));
        let bias_score = if any(&["bias", "discrimination", "unfair"]) {
            0.28
        } else {
            round_to(uniform(rng, 0.05, 0.20), 3)
        };
        let transparency_score = if any(&["unexplained", "black box", "unclear"]) {
            0.45
        } else {
            round_to(uniform(rng, 0.55, 0.88), 3)
        };
        let accuracy = if any(&["inaccurate", "wrong", "error"]) {
            0.72
        } else {
            round_to(uniform(rng, 0.78, 0.96), 3)
        };
        let feature_names = if t.contains("gender") {
            vec!["gender".to_string()]
        } else if t.contains("race") {
            vec!["race".to_string()]
        } else {
            Vec::new()
        };
        let fields_present = if t.contains("confidence") {
            vec!["confidence_score".to_string(), "decision_basis".to_string()]
        } else {
            Vec::new()
        };
        Self {
            bias_score: Some(bias_score),
            transparency_score: Some(transparency_score),
            accuracy: Some(accuracy),
            human_oversight: Some(any(&["review", "human", "oversight"])),
            fields_present,
            feature_names,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A value on either side of a checklist comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Flag(bool),
    Number(f64),
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub check: String,
    pub severity: Severity,
    pub measured: CheckValue,
    pub threshold: CheckValue,
    pub article_ref: String,
    pub article_title: String,
    pub finding: String,
    pub remediation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub critical: usize,
    pub warn: usize,
    pub pass: usize,
    pub total: usize,
    pub pass_rate: f64,
    pub overall_verdict: saro_core::Verdict,
}

impl From<ChecklistSummary> for BenchmarkSummary {
    fn from(s: ChecklistSummary) -> Self {
        Self {
            critical: s.critical,
            warn: s.warnings,
            pass: s.passed,
            total: s.total,
            pass_rate: s.pass_rate,
            overall_verdict: s.verdict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkChecklist {
    pub checklist: Vec<ChecklistItem>,
    pub summary: BenchmarkSummary,
    pub policy_applied: Policy,
    pub domain: Domain,
}

fn item(check: impl Into<String>, severity: Severity, measured: CheckValue, threshold: CheckValue, article: ArticleRef, finding: String, remediation: impl Into<String>) -> ChecklistItem {
    ChecklistItem {
        check: check.into(),
        severity,
        measured,
        threshold,
        article_ref: article.reference.to_string(),
        article_title: article.title.to_string(),
        finding,
        remediation: remediation.into(),
    }
}

/// Evaluate `output` against `policy` for a model deployed in `domain`.
pub fn generate_checklist<R: Rng + ?Sized>(
    rng: &mut R,
    output: &ModelOutput,
    policy: Policy,
    domain: Domain,
) -> BenchmarkChecklist {
    let b = benchmark(policy);
    let d = domain_checks(domain);
    let mut checklist = Vec::with_capacity(6);

    // Bias
    let bias = output
        .bias_score
        .unwrap_or_else(|| round_to(uniform(rng, 0.05, 0.35), 3));
    let t = b.bias_threshold;
    let sev = if bias > t * 1.5 {
        Severity::Critical
    } else if bias > t {
        Severity::Warn
    } else {
        Severity::Pass
    };
    checklist.push(item(
        "Bias Score Evaluation",
        sev,
        CheckValue::Number(bias),
        CheckValue::Number(t),
        b.bias,
        format!(
            "Bias score {bias:.3} {} {t} threshold",
            if bias > t { "exceeds" } else { "within" }
        ),
        format!(
            "Retrain with balanced dataset; implement {} bias mitigation",
            if sev == Severity::Critical { "immediate" } else { "scheduled" }
        ),
    ));

    // Transparency
    let transparency = output
        .transparency_score
        .unwrap_or_else(|| round_to(uniform(rng, 0.40, 0.90), 3));
    let min = b.transparency_min;
    let sev = if transparency < min * 0.8 {
        Severity::Critical
    } else if transparency < min {
        Severity::Warn
    } else {
        Severity::Pass
    };
    checklist.push(item(
        "Explainability & Transparency",
        sev,
        CheckValue::Number(transparency),
        CheckValue::Number(min),
        b.transparency,
        format!(
            "Transparency score {transparency:.2} {} minimum",
            if transparency < min { "below" } else { "meets" }
        ),
        "Implement SHAP/LIME explanations; add decision rationale to all outputs",
    ));

    // Accuracy
    let accuracy = output
        .accuracy
        .unwrap_or_else(|| round_to(uniform(rng, 0.65, 0.97), 3));
    let min = b.accuracy_min;
    let sev = if accuracy < min * 0.9 {
        Severity::Critical
    } else if accuracy < min {
        Severity::Warn
    } else {
        Severity::Pass
    };
    checklist.push(item(
        "Model Accuracy",
        sev,
        CheckValue::Number(accuracy),
        CheckValue::Number(min),
        b.accuracy,
        format!(
            "Model accuracy {:.1}% {} regulatory minimum",
            accuracy * 100.0,
            if accuracy < min { "below" } else { "meets" }
        ),
        "Expand training dataset; perform hyperparameter tuning; validate on hold-out set",
    ));

    // Human oversight
    let oversight = output.human_oversight.unwrap_or_else(|| rng.gen_bool(0.5));
    let sev = match (oversight, policy) {
        (true, _) => Severity::Pass,
        (false, Policy::FdaSamd) => Severity::Critical,
        (false, _) => Severity::Warn,
    };
    checklist.push(item(
        "Human Oversight Mechanism",
        sev,
        CheckValue::Flag(oversight),
        CheckValue::Flag(true),
        b.human_oversight,
        if oversight {
            "Human oversight present".to_string()
        } else {
            "Human oversight NOT CONFIGURED: mandatory for high-risk AI".to_string()
        },
        "Implement review queue with escalation paths; configure override mechanisms for all high-risk decisions",
    ));

    // Required fields
    let missing: Vec<&str> = d
        .required_fields
        .iter()
        .copied()
        .filter(|f| !output.fields_present.iter().any(|p| p == f))
        .collect();
    let sev = match missing.len() {
        0 => Severity::Pass,
        1 => Severity::Warn,
        _ => Severity::Critical,
    };
    let joined = missing.join(", ");
    checklist.push(item(
        format!("Required Output Fields ({} Domain)", domain.title()),
        sev,
        CheckValue::List(output.fields_present.clone()),
        CheckValue::List(d.required_fields.iter().map(|s| (*s).to_string()).collect()),
        b.documentation,
        format!(
            "Missing {} required field(s): {}",
            missing.len(),
            if missing.is_empty() { "None" } else { joined.as_str() }
        ),
        format!(
            "Add missing output fields: {}",
            if missing.is_empty() {
                "All present, no action needed"
            } else {
                joined.as_str()
            }
        ),
    ));

    // Protected attributes
    let features = output.feature_names.join(" ").to_lowercase();
    let flagged: Vec<String> = d
        .protected_attributes
        .iter()
        .filter(|a| features.contains(*a))
        .map(|a| (*a).to_string())
        .collect();
    let sev = match flagged.len() {
        0 => Severity::Pass,
        1 | 2 => Severity::Warn,
        _ => Severity::Critical,
    };
    let finding = if flagged.is_empty() {
        "No direct protected attributes in feature set".to_string()
    } else {
        format!("Direct use of protected attributes detected: {}", flagged.join(", "))
    };
    checklist.push(item(
        "Protected Attribute Exposure",
        sev,
        CheckValue::List(flagged),
        CheckValue::Text("zero direct use".into()),
        b.bias,
        finding,
        "Remove or proxy protected attributes; apply fairness constraints during training",
    ));

    let summary = ChecklistSummary::from_severities(checklist.iter().map(|c| c.severity));
    tracing::debug!(%policy, %domain, verdict = %summary.verdict, "benchmark checklist generated");

    BenchmarkChecklist {
        checklist,
        summary: summary.into(),
        policy_applied: policy,
        domain,
    }
}

/// Benchmark thresholds for listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkListing {
    pub id: Policy,
    pub name: Policy,
    pub bias_threshold: f64,
    pub transparency_min: f64,
    pub accuracy_min: f64,
}

pub fn list_benchmarks() -> Vec<BenchmarkListing> {
    Policy::ALL
        .into_iter()
        .map(|p| {
            let b = benchmark(p);
            BenchmarkListing {
                id: p,
                name: p,
                bias_threshold: b.bias_threshold,
                transparency_min: b.transparency_min,
                accuracy_min: b.accuracy_min,
            }
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn policy() -> impl Strategy<Value = Policy> {
        prop::sample::select(Policy::ALL.to_vec())
    }

    fn output(bias: f64, accuracy: f64) -> ModelOutput {
        ModelOutput {
            bias_score: Some(bias),
            transparency_score: Some(0.9),
            accuracy: Some(accuracy),
            human_oversight: Some(true),
            fields_present: Vec::new(),
            feature_names: Vec::new(),
        }
    }

    proptest! {
        /// Bias goes critical above 1.5x the policy threshold.
        #[test]
        fn bias_bands(p in policy(), bias in 0.0f64..0.6) {
            let c = generate_checklist(&mut StdRng::seed_from_u64(0), &output(bias, 0.99), p, Domain::General);
            let t = benchmark(p).bias_threshold;
            let expected = if bias > t * 1.5 {
                Severity::Critical
            } else if bias > t {
                Severity::Warn
            } else {
                Severity::Pass
            };
            prop_assert_eq!(c.checklist[0].severity, expected);
        }

        /// Accuracy goes critical below 0.9x the policy minimum.
        #[test]
        fn accuracy_bands(p in policy(), accuracy in 0.5f64..1.0) {
            let c = generate_checklist(&mut StdRng::seed_from_u64(0), &output(0.0, accuracy), p, Domain::General);
            let min = benchmark(p).accuracy_min;
            let expected = if accuracy < min * 0.9 {
                Severity::Critical
            } else if accuracy < min {
                Severity::Warn
            } else {
                Severity::Pass
            };
            prop_assert_eq!(c.checklist[2].severity, expected);
        }
    }
}
