//! # Regulatory Forecasts
//!
//! Templated forecasts of upcoming regulatory changes, monthly regional risk
//! trends and a model × regulation risk heatmap.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use saro_core::{month_label, round_to, uniform, RiskLevel};
use serde::{Deserialize, Serialize};

/// Reported accuracy of the forecast model.
pub const FORECAST_MODEL_ACCURACY: f64 = 0.87;

/// Models shown on the risk heatmap.
pub const HEATMAP_MODELS: [&str; 5] = [
    "CreditScorer-v2",
    "HRScreener-v1",
    "FraudDetect-v3",
    "LoanApproval-v4",
    "DiagnosticAI-v1",
];

/// Regulations shown on the risk heatmap.
pub const HEATMAP_REGULATIONS: [&str; 5] = ["EU AI Act", "GDPR", "NIST AI RMF", "HIPAA", "ISO 42001"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub regulation: String,
    pub jurisdiction: String,
    pub change_type: String,
    pub predicted_date: DateTime<Utc>,
    pub probability: f64,
    pub impact: RiskLevel,
    pub description: String,
    pub affected_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub jurisdiction: String,
    pub horizon_days: i64,
    pub generated_at: DateTime<Utc>,
    pub forecast_count: usize,
    pub forecasts: Vec<Forecast>,
    pub model_accuracy: f64,
}

#[allow(clippy::too_many_arguments)]
fn forecast(
    now: DateTime<Utc>,
    regulation: &str,
    jurisdiction: &str,
    change_type: &str,
    in_days: i64,
    probability: f64,
    impact: RiskLevel,
    description: &str,
    affected: &[&str],
) -> Forecast {
    Forecast {
        regulation: regulation.to_string(),
        jurisdiction: jurisdiction.to_string(),
        change_type: change_type.to_string(),
        predicted_date: now + Duration::days(in_days),
        probability,
        impact,
        description: description.to_string(),
        affected_categories: affected.iter().map(|s| (*s).to_string()).collect(),
    }
}

/// Forecast regulatory changes for the next `horizon_days`.
///
/// The UK forecast lands exactly on the horizon; the others are fixed
/// offsets from `now`.
pub fn regulatory_forecast(now: DateTime<Utc>, jurisdiction: &str, horizon_days: i64) -> ForecastReport {
    let forecasts = vec![
        forecast(
            now,
            "EU AI Act",
            "EU",
            "enforcement_date",
            45,
            0.92,
            RiskLevel::High,
            "High-risk AI system requirements become enforceable",
            &["healthcare", "finance", "HR"],
        ),
        forecast(
            now,
            "NIST AI RMF 2.0",
            "US",
            "framework_update",
            60,
            0.78,
            RiskLevel::Medium,
            "Updated risk management framework with GenAI addendum",
            &["all"],
        ),
        forecast(
            now,
            "UK AI Regulation Bill",
            "UK",
            "new_legislation",
            horizon_days,
            0.65,
            RiskLevel::High,
            "Sector-specific AI regulation passage expected",
            &["finance", "healthcare"],
        ),
    ];
    ForecastReport {
        jurisdiction: jurisdiction.to_string(),
        horizon_days,
        generated_at: now,
        forecast_count: forecasts.len(),
        forecasts,
        model_accuracy: FORECAST_MODEL_ACCURACY,
    }
}

/// Regional risk index for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub eu: u32,
    pub us: u32,
    pub apac: u32,
}

/// Six months of regional risk trends, oldest first, ending with the month of `now`.
pub fn risk_trends<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Vec<TrendPoint> {
    (0..6u32)
        .rev()
        .map(|back| TrendPoint {
            month: month_label(now, back),
            eu: rng.gen_range(55..=85),
            us: rng.gen_range(45..=75),
            apac: rng.gen_range(35..=65),
        })
        .collect()
}

/// One heatmap row: a model and its risk score per regulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRow {
    pub model: String,
    #[serde(flatten)]
    pub scores: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskHeatmap {
    pub models: Vec<String>,
    pub regulations: Vec<String>,
    pub heatmap: Vec<HeatmapRow>,
}

/// Random risk scores in `[0.3, 1.0]` for every model × regulation pair.
pub fn risk_heatmap<R: Rng + ?Sized>(rng: &mut R) -> RiskHeatmap {
    let heatmap = HEATMAP_MODELS
        .iter()
        .map(|model| {
            let scores = HEATMAP_REGULATIONS
                .iter()
                .map(|reg| ((*reg).to_string(), serde_json::json!(round_to(uniform(rng, 0.3, 1.0), 2))))
                .collect();
            HeatmapRow {
                model: (*model).to_string(),
                scores,
            }
        })
        .collect();
    RiskHeatmap {
        models: HEATMAP_MODELS.iter().map(|s| (*s).to_string()).collect(),
        regulations: HEATMAP_REGULATIONS.iter().map(|s| (*s).to_string()).collect(),
        heatmap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn uk_forecast_tracks_horizon() {
        let r = regulatory_forecast(fixed(), "EU", 120);
        assert_eq!(r.forecast_count, 3);
        assert_eq!(r.forecasts[0].predicted_date, fixed() + Duration::days(45));
        assert_eq!(r.forecasts[2].predicted_date, fixed() + Duration::days(120));
        assert_eq!(r.forecasts[1].impact, RiskLevel::Medium);
        assert_eq!(r.model_accuracy, 0.87);
    }

    #[test]
    fn trends_end_at_current_month() {
        let mut rng = StdRng::seed_from_u64(2);
        let t = risk_trends(&mut rng, fixed());
        assert_eq!(t.len(), 6);
        assert_eq!(t[0].month, "2025-08");
        assert_eq!(t[5].month, "2026-01");
        assert!(t.iter().all(|p| (55..=85).contains(&p.eu) && (35..=65).contains(&p.apac)));
    }

    #[test]
    fn heatmap_covers_every_pair() {
        let mut rng = StdRng::seed_from_u64(2);
        let h = risk_heatmap(&mut rng);
        assert_eq!(h.heatmap.len(), 5);
        for row in &h.heatmap {
            assert_eq!(row.scores.len(), 5);
            for v in row.scores.values() {
                let x = v.as_f64().unwrap();
                assert!((0.3..=1.0).contains(&x));
            }
        }
        let json = serde_json::to_value(&h.heatmap[0]).unwrap();
        assert!(json.get("GDPR").is_some());
        assert_eq!(json["model"], "CreditScorer-v2");
    }
}
