//! # saro-rules: Regulatory Rule Tables and Evaluators
//!
//! Pure functions over static tables. Nothing here stores state or performs
//! I/O; every function that needs entropy takes a caller-supplied
//! `rand::Rng`, and every function that stamps time takes `now`.
//!
//! | Module | Evaluates |
//! |--------|-----------|
//! | [`agent`] | Text-to-metric extraction, threshold checklists, the 8-stage pipeline run, non-standard document analysis |
//! | [`benchmark`] | Model-output checklist against policy benchmarks and domain profiles |
//! | [`guardrails`] | Output violation scan (PII, bias, hallucination, regulatory) |
//! | [`ingestion`] | Entity and risk tagging of regulatory documents |
//! | [`audit`] | Use-case audits and applicable regulations |
//! | [`standards`] | Standards-aligned audit reports (EU AI Act, NIST AI RMF, ISO 42001) |
//! | [`surveillance`] | Ethics scan for prohibited surveillance capabilities |
//! | [`policy_library`] | Policy and feed seed tables, upload risk scoring |
//! | [`forecast`] | Regulatory forecasts, risk trends, risk heatmap |
//!
//! Policy names and domains are resolved through [`policy::Policy`] and
//! [`policy::Domain`]; unknown names fall back to EU AI Act and `general`.

pub mod agent;
pub mod audit;
pub mod benchmark;
pub mod forecast;
pub mod guardrails;
pub mod ingestion;
pub mod policy;
pub mod policy_library;
pub mod standards;
pub mod surveillance;

pub use agent::{
    analyse_document, extract_metrics_from_text, run_pipeline, run_policy_checks, AgentRun,
    AgentRunRequest, DocumentAnalysis, PolicyCheck,
};
pub use benchmark::{generate_checklist, BenchmarkChecklist, ModelOutput};
pub use guardrails::{check_violations, GuardrailAssessment, Violation};
pub use policy::{Domain, Policy};
pub use standards::{generate_report, AuditReport, ReportRequest, Standard};
pub use surveillance::{scan as surveillance_scan, SurveillanceScan};
