//! # Evaluate Subcommand
//!
//! Runs the agent pipeline in-process on a piece of model output and
//! prints the resulting run as pretty JSON.

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use saro_core::{IdPrefix, RecordId, Verdict};
use saro_rules::{run_pipeline, AgentRun, AgentRunRequest, Policy};

/// Arguments for the `saro evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Policy benchmark to evaluate against.
    #[arg(long, default_value = "EU AI Act")]
    pub policy: String,

    /// Deployment domain (finance, healthcare, hr, general).
    #[arg(long, default_value = "general")]
    pub domain: String,

    /// Model output text to analyse.
    #[arg(long)]
    pub text: String,

    /// Model name recorded on the run.
    #[arg(long)]
    pub model_name: Option<String>,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Exit with status 1 when the verdict is FAIL.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the evaluate subcommand.
///
/// Returns exit code: 0 on success, 1 if `--strict` and the run fails.
pub fn run_evaluate(args: &EvaluateArgs) -> Result<u8> {
    let run = evaluate(args)?;
    let json = serde_json::to_string_pretty(&run).context("failed to serialize run")?;
    println!("{json}");

    if args.strict && run.summary.verdict == Verdict::Fail {
        return Ok(1);
    }
    Ok(0)
}

/// Run the pipeline for `args` without printing.
pub fn evaluate(args: &EvaluateArgs) -> Result<AgentRun> {
    if args.text.trim().is_empty() {
        bail!("--text must not be empty");
    }
    if Policy::parse(&args.policy).is_none() {
        let known: Vec<&str> = Policy::ALL.iter().map(|p| p.as_str()).collect();
        bail!("unknown policy {:?}; expected one of {}", args.policy, known.join(", "));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let request = AgentRunRequest {
        model_name: args.model_name.clone(),
        policy: Some(args.policy.clone()),
        domain: Some(args.domain.clone()),
        output_text: Some(args.text.clone()),
        ..AgentRunRequest::default()
    };
    let run_id = RecordId::generate(IdPrefix::Run).into_string();
    tracing::info!(run_id = %run_id, policy = %args.policy, "evaluating model output");
    Ok(run_pipeline(&mut rng, saro_core::now(), &run_id, &request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> EvaluateArgs {
        EvaluateArgs {
            policy: "EU AI Act".to_string(),
            domain: "finance".to_string(),
            text: text.to_string(),
            model_name: Some("CreditScorer-v2".to_string()),
            seed: Some(42),
            strict: false,
        }
    }

    #[test]
    fn text_run_is_agent_extracted() {
        let run = evaluate(&args("Loan denied automatically. Black box model, no human review.")).unwrap();
        assert!(run.agent_extracted);
        assert_eq!(run.input_type, "text");
        assert_eq!(run.model_name, "CreditScorer-v2");
        assert!(run.run_id.starts_with("RUN-"));
    }

    #[test]
    fn same_seed_same_checklist() {
        let a = evaluate(&args("Decision explained to applicant with human oversight.")).unwrap();
        let b = evaluate(&args("Decision explained to applicant with human oversight.")).unwrap();
        assert_eq!(a.checklist, b.checklist);
        assert_eq!(a.summary.verdict, b.summary.verdict);
    }

    #[test]
    fn unknown_policy_rejected() {
        let mut a = args("anything");
        a.policy = "GDPR".to_string();
        let err = evaluate(&a).unwrap_err();
        assert!(err.to_string().contains("unknown policy"));
    }

    #[test]
    fn blank_text_rejected() {
        assert!(evaluate(&args("   ")).is_err());
    }
}
