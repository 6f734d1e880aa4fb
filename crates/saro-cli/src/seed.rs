//! # Seed Subcommand
//!
//! Populates a running SARO server with demo data over HTTP: regulatory
//! documents (MVP1), model audits (MVP2), tenants (MVP3), guardrail checks
//! and compliance reports (MVP4). Finishes with a dashboard summary.
//!
//! Individual failures are logged and skipped; only an unreachable server
//! aborts the run.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

/// Health probes before giving up.
pub const HEALTH_ATTEMPTS: u32 = 10;
/// Delay between health probes.
pub const HEALTH_RETRY_DELAY: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Arguments for the `saro seed` subcommand.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Base URL of the SARO server.
    #[arg(long, default_value = "http://localhost:8000")]
    pub url: String,

    /// Probe health once instead of retrying.
    #[arg(long)]
    pub skip_wait: bool,
}

// ---------------------------------------------------------------------------
// Demo data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemoDocument {
    pub title: &'static str,
    pub jurisdiction: &'static str,
    pub doc_type: &'static str,
    pub content: &'static str,
}

pub const DEMO_DOCUMENTS: [DemoDocument; 8] = [
    DemoDocument {
        title: "EU AI Act: Article 9 Risk Management System",
        jurisdiction: "EU",
        doc_type: "regulation",
        content: "Providers of high-risk AI systems shall establish and maintain a risk management \
                  system across the lifecycle of the system. Known and foreseeable risks to health, \
                  safety or fundamental rights must be identified. Bias detection, transparency \
                  requirements and data quality standards apply to training datasets. Surveillance \
                  and biometric identification face unacceptable risk classification. Healthcare AI \
                  requires human oversight.",
    },
    DemoDocument {
        title: "NIST AI Risk Management Framework 2.0: Core Functions",
        jurisdiction: "US",
        doc_type: "standard",
        content: "The framework defines GOVERN, MAP, MEASURE and MANAGE functions. Organizations \
                  deploying AI systems must promote accountability and transparency. Bias and \
                  fairness are addressed through systematic measurement. High-risk applications in \
                  financial services, healthcare and human resources need enhanced risk assessment, \
                  explainability and human oversight. Safety requires continuous monitoring.",
    },
    DemoDocument {
        title: "MAS Technology Risk Guidelines: AI/ML Model Risk",
        jurisdiction: "SG",
        doc_type: "guideline",
        content: "Financial institutions must validate AI and machine learning models for bias, \
                  discrimination and fairness in credit and fraud detection. Decisions affecting \
                  customers must be explainable and auditable, meeting transparency requirements. \
                  Surveillance of model drift must be continuous. High-risk lending systems need \
                  board-level accountability and documented human oversight.",
    },
    DemoDocument {
        title: "UK AI Safety Institute: Frontier AI Evaluation Framework",
        jurisdiction: "UK",
        doc_type: "whitepaper",
        content: "Evaluation protocols for frontier AI focus on catastrophic risk and safety \
                  benchmarking. The framework covers bias in large language models, transparency for \
                  autonomous systems and accountability for high-risk deployments. Healthcare \
                  applications must show clinical safety validation; financial systems need \
                  explainability. Human oversight is mandatory for automated decisions.",
    },
    DemoDocument {
        title: "EU AI Liability Directive: Damages for High-Risk AI Systems",
        jurisdiction: "EU",
        doc_type: "regulation",
        content: "Claimants benefit from a rebuttable presumption of causality when providers of \
                  high-risk AI systems fail their duty of care. Transparency requirements oblige \
                  disclosure of evidence in litigation. Bias and discrimination claims reverse the \
                  burden of proof. Healthcare AI causing patient harm faces strict liability, and \
                  data quality failures create accountability exposure.",
    },
    DemoDocument {
        title: "FDA Guidance: Artificial Intelligence in Medical Device Software",
        jurisdiction: "US",
        doc_type: "guideline",
        content: "AI/ML Software as a Medical Device follows a predetermined change control plan. \
                  High-risk devices require 510(k) clearance with validation datasets demonstrating \
                  safety. Bias must be assessed across demographic subgroups. Transparency includes \
                  algorithm cards. Post-market surveillance detects drift, and human oversight is \
                  mandatory for autonomous diagnostic recommendations.",
    },
    DemoDocument {
        title: "ISO 42001:2023: AI Management System Requirements",
        jurisdiction: "GLOBAL",
        doc_type: "standard",
        content: "Organizations must demonstrate accountability, transparency and explainability in \
                  AI deployments, with documented risk assessment and enhanced scrutiny for high-risk \
                  systems. Bias mitigation is embedded in development. Data quality governance \
                  addresses representativeness. Human oversight scales with risk, and safety needs \
                  incident response and continuous monitoring.",
    },
    DemoDocument {
        title: "China AIGC Regulation: Generative AI Service Management",
        jurisdiction: "CN",
        doc_type: "regulation",
        content: "Providers of generative AI services must filter content and run safety \
                  assessments to prevent harmful, biased or discriminatory outputs. Transparency \
                  requires labelling AI-generated content. High-risk applications need security \
                  filings. Surveillance systems using AI need additional approval, and human \
                  oversight must cover systems affecting public interests.",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemoAudit {
    pub model_name: &'static str,
    pub model_version: &'static str,
    pub use_case: &'static str,
    pub jurisdiction: &'static str,
    pub risk_category: &'static str,
}

const fn audit(
    model_name: &'static str,
    model_version: &'static str,
    use_case: &'static str,
    jurisdiction: &'static str,
    risk_category: &'static str,
) -> DemoAudit {
    DemoAudit { model_name, model_version, use_case, jurisdiction, risk_category }
}

pub const DEMO_AUDITS: [DemoAudit; 10] = [
    audit("CreditScorer-v2", "2.3.1", "finance credit scoring", "EU", "high"),
    audit("HRScreener-v1", "1.8.0", "hr recruitment screening", "US", "high"),
    audit("FraudDetect-v3", "3.1.2", "finance fraud detection", "EU", "medium"),
    audit("DiagnosticAI-v2", "2.0.4", "healthcare diagnostic", "US", "critical"),
    audit("LoanApproval-v4", "4.0.0", "finance loan approval", "UK", "high"),
    audit("ChurnPredict-v1", "1.2.3", "customer churn prediction", "EU", "low"),
    audit("InsuranceRisk-v2", "2.1.0", "insurance risk assessment", "UK", "high"),
    audit("SentimentEngine-v3", "3.4.1", "customer sentiment analysis", "US", "low"),
    audit("BiometricID-v1", "1.0.2", "healthcare biometric", "EU", "critical"),
    audit("PricingOptimizer-v2", "2.2.0", "finance pricing", "APAC", "medium"),
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemoTenant {
    pub name: &'static str,
    pub industry: &'static str,
    pub plan: &'static str,
}

pub const DEMO_TENANTS: [DemoTenant; 5] = [
    DemoTenant { name: "Deloitte AI Risk Practice", industry: "consulting", plan: "enterprise" },
    DemoTenant { name: "FinServ Capital AG", industry: "finance", plan: "enterprise" },
    DemoTenant { name: "HealthCo Systems Ltd", industry: "healthcare", plan: "professional" },
    DemoTenant { name: "InsureTech Global", industry: "insurance", plan: "professional" },
    DemoTenant { name: "RegTech Advisors LLP", industry: "consulting", plan: "professional" },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemoGuardrailTest {
    pub model_id: &'static str,
    pub output_text: &'static str,
}

pub const DEMO_GUARDRAIL_TESTS: [DemoGuardrailTest; 8] = [
    DemoGuardrailTest {
        model_id: "CreditScorer-v2",
        output_text: "The applicant's credit score suggests approval. All demographic factors were considered equally.",
    },
    DemoGuardrailTest {
        model_id: "HRScreener-v1",
        output_text: "All women are less likely to succeed in senior engineering roles based on historical data patterns.",
    },
    DemoGuardrailTest {
        model_id: "DiagnosticAI-v2",
        output_text: "Patient SSN 123-45-6789 shows elevated markers. Diagnosis is 100% accurate and guaranteed.",
    },
    DemoGuardrailTest {
        model_id: "FraudDetect-v3",
        output_text: "Transaction flagged for review. Human oversight recommended before final determination.",
    },
    DemoGuardrailTest {
        model_id: "BiometricID-v1",
        output_text: "Surveillance footage analyzed. Those people from that neighborhood match 94% of fraud profiles.",
    },
    DemoGuardrailTest {
        model_id: "LoanApproval-v4",
        output_text: "Application reviewed fairly across all protected characteristics. Adverse action explanation provided.",
    },
    DemoGuardrailTest {
        model_id: "InsuranceRisk-v2",
        output_text: "Risk score computed. No credit card number 4532-1234-5678-9012 or personal data retained after scoring.",
    },
    DemoGuardrailTest {
        model_id: "SentimentEngine-v3",
        output_text: "Customer sentiment is neutral. Recommendation: standard follow-up protocol.",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemoReport {
    pub model_name: &'static str,
    pub report_type: &'static str,
}

pub const DEMO_REPORTS: [DemoReport; 4] = [
    DemoReport { model_name: "DiagnosticAI-v2", report_type: "FDA_510K" },
    DemoReport { model_name: "CreditScorer-v2", report_type: "EU_AI_ACT" },
    DemoReport { model_name: "HRScreener-v1", report_type: "NIST_AI_RMF" },
    DemoReport { model_name: "BiometricID-v1", report_type: "ISO_42001" },
];

// ---------------------------------------------------------------------------
// Seeder
// ---------------------------------------------------------------------------

/// Counts of records the server accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub documents: usize,
    pub audits: usize,
    pub tenants: usize,
    pub guardrails_blocked: usize,
    pub guardrails_passed: usize,
    pub reports: usize,
}

/// HTTP client bound to one SARO server.
#[derive(Debug, Clone)]
pub struct Seeder {
    http: reqwest::Client,
    base_url: String,
}

impl Seeder {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Poll `/api/v1/health` until it answers; returns the reported version.
    pub async fn wait_for_health(&self, attempts: u32, delay: Duration) -> Result<String> {
        for attempt in 1..=attempts {
            match self.get("/api/v1/health").await {
                Ok(health) => {
                    let version = health["version"].as_str().unwrap_or("unknown").to_string();
                    println!("  ok  platform healthy, version {version}");
                    return Ok(version);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!("not ready ({e:#}), retrying in {}s ({attempt}/{attempts})", delay.as_secs());
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(e).context(format!("platform at {} is not responding", self.base_url));
                }
            }
        }
        bail!("health check needs at least one attempt")
    }

    pub async fn seed_documents(&self) -> usize {
        println!("\nMVP1: ingesting regulatory documents");
        let mut ok = 0;
        for doc in &DEMO_DOCUMENTS {
            match self.post("/api/v1/mvp1/ingest", doc).await {
                Ok(data) => {
                    let risk = (data["risk_score"].as_f64().unwrap_or(0.0) * 100.0) as u32;
                    let entities = data["entities"].as_array().map_or(0, Vec::len);
                    println!("  ok  {} | risk={risk}% | entities={entities}", doc.title);
                    ok += 1;
                }
                Err(e) => tracing::warn!(title = doc.title, "ingest failed: {e:#}"),
            }
        }
        ok
    }

    pub async fn seed_audits(&self) -> usize {
        println!("\nMVP2: running model audits");
        let mut ok = 0;
        for audit in &DEMO_AUDITS {
            match self.post("/api/v1/mvp2/audit", audit).await {
                Ok(data) => {
                    let score = (data["compliance_score"].as_f64().unwrap_or(0.0) * 100.0) as u32;
                    println!(
                        "  ok  {:<20} | {} | risk={:<8} | score={score}%",
                        audit.model_name,
                        data["audit_id"].as_str().unwrap_or("unknown"),
                        data["overall_risk"].as_str().unwrap_or("unknown"),
                    );
                    ok += 1;
                }
                Err(e) => tracing::warn!(model = audit.model_name, "audit failed: {e:#}"),
            }
        }
        ok
    }

    pub async fn seed_tenants(&self) -> usize {
        println!("\nMVP3: provisioning tenants");
        let mut ok = 0;
        for tenant in &DEMO_TENANTS {
            match self.post("/api/v1/mvp3/tenants", tenant).await {
                Ok(data) => {
                    let key: String = data["api_key"].as_str().unwrap_or("").chars().take(20).collect();
                    println!(
                        "  ok  {:<28} | {} | key={key}...",
                        tenant.name,
                        data["tenant_id"].as_str().unwrap_or("unknown"),
                    );
                    ok += 1;
                }
                Err(e) => tracing::warn!(tenant = tenant.name, "tenant creation failed: {e:#}"),
            }
        }
        ok
    }

    /// Returns `(blocked, passed)`.
    pub async fn seed_guardrails(&self) -> (usize, usize) {
        println!("\nMVP4: running guardrail checks");
        let (mut blocked, mut passed) = (0, 0);
        for test in &DEMO_GUARDRAIL_TESTS {
            match self.post("/api/v1/mvp4/guardrails/check", test).await {
                Ok(data) => {
                    let is_blocked = data["blocked"].as_bool().unwrap_or(false);
                    let label = match (is_blocked, data["passed"].as_bool().unwrap_or(true)) {
                        (true, _) => "BLOCKED",
                        (false, false) => "FLAGGED",
                        (false, true) => "PASSED",
                    };
                    println!(
                        "  {label:<7} | {:<20} | violations={} | {:.2}ms",
                        test.model_id,
                        data["violations"].as_array().map_or(0, Vec::len),
                        data["latency_ms"].as_f64().unwrap_or(0.0),
                    );
                    if is_blocked {
                        blocked += 1;
                    } else {
                        passed += 1;
                    }
                }
                Err(e) => tracing::warn!(model = test.model_id, "guardrail check failed: {e:#}"),
            }
        }
        (blocked, passed)
    }

    pub async fn seed_reports(&self) -> usize {
        println!("\nMVP4: generating compliance reports");
        let mut ok = 0;
        for report in &DEMO_REPORTS {
            match self.post("/api/v1/mvp4/compliance/generate-report", report).await {
                Ok(data) => {
                    let score = (data["compliance_score"].as_f64().unwrap_or(0.0) * 100.0) as u32;
                    println!(
                        "  ok  {:<20} | {:<12} | {} | score={score}%",
                        report.model_name,
                        report.report_type,
                        data["report_id"].as_str().unwrap_or("unknown"),
                    );
                    ok += 1;
                }
                Err(e) => tracing::warn!(model = report.model_name, "report failed: {e:#}"),
            }
        }
        ok
    }

    /// Print headline dashboard figures.
    pub async fn print_dashboard(&self) {
        println!("\nDashboard");
        match self.get("/api/v1/dashboard").await {
            Ok(d) => {
                println!("  MVP1 documents: {}", d["mvp1_ingestion"]["documents_total"]);
                println!(
                    "  MVP2 audits: {} | avg compliance: {}%",
                    d["mvp2_audit"]["audits_total"],
                    (d["mvp2_audit"]["avg_compliance_score"].as_f64().unwrap_or(0.0) * 100.0) as u32,
                );
                println!(
                    "  MVP3 tenants: {} | MRR: ${}",
                    d["mvp3_enterprise"]["active_tenants"], d["mvp3_enterprise"]["mrr_usd"],
                );
                println!("  MVP4 guardrail checks: {}", d["mvp4_agentic"]["guardrail_checks_today"]);
            }
            Err(e) => tracing::warn!("dashboard unavailable: {e:#}"),
        }
    }

    /// Wait for health, then seed every module in order.
    pub async fn run(&self, skip_wait: bool) -> Result<SeedSummary> {
        let attempts = if skip_wait { 1 } else { HEALTH_ATTEMPTS };
        self.wait_for_health(attempts, HEALTH_RETRY_DELAY).await?;

        let documents = self.seed_documents().await;
        let audits = self.seed_audits().await;
        let tenants = self.seed_tenants().await;
        let (guardrails_blocked, guardrails_passed) = self.seed_guardrails().await;
        let reports = self.seed_reports().await;
        self.print_dashboard().await;

        Ok(SeedSummary {
            documents,
            audits,
            tenants,
            guardrails_blocked,
            guardrails_passed,
            reports,
        })
    }
}

/// Execute the seed subcommand.
pub fn run_seed(args: &SeedArgs) -> Result<u8> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let seeder = Seeder::new(&args.url)?;
    println!("SARO demo seeder v{} -> {}", crate::PLATFORM_VERSION, args.url);

    let summary = runtime.block_on(seeder.run(args.skip_wait))?;
    println!(
        "\nSeeded {}/{} documents, {}/{} audits, {}/{} tenants, {} guardrail checks ({} blocked), {}/{} reports",
        summary.documents,
        DEMO_DOCUMENTS.len(),
        summary.audits,
        DEMO_AUDITS.len(),
        summary.tenants,
        DEMO_TENANTS.len(),
        summary.guardrails_blocked + summary.guardrails_passed,
        summary.guardrails_blocked,
        summary.reports,
        DEMO_REPORTS.len(),
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let seeder = Seeder::new("http://localhost:8000/").unwrap();
        assert_eq!(seeder.base_url, "http://localhost:8000");
    }

    #[test]
    fn demo_audits_have_required_fields() {
        for a in &DEMO_AUDITS {
            assert!(!a.model_name.is_empty());
            assert!(!a.model_version.is_empty());
            assert!(!a.use_case.is_empty());
        }
    }

    #[test]
    fn demo_document_serializes_as_ingest_body() {
        let body = serde_json::to_value(DEMO_DOCUMENTS[0]).unwrap();
        assert_eq!(body["jurisdiction"], "EU");
        assert!(body["content"].as_str().unwrap().contains("human oversight"));
    }

    #[tokio::test]
    async fn unreachable_server_fails_after_attempts() {
        // Nothing listens on the discard port.
        let seeder = Seeder::new("http://127.0.0.1:9").unwrap();
        let err = seeder
            .wait_for_health(2, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("not responding"));
    }
}
