//! # MVP4: AI Fluency Training

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// (id, title, persona, duration_min, completion_rate)
const COURSES: [(&str, &str, &str, u32, f64); 5] = [
    ("C001", "AI Regulation Fundamentals", "all", 45, 0.87),
    ("C002", "EU AI Act Deep Dive", "Forecaster", 90, 0.72),
    ("C003", "Risk Assessment Practicum", "Autopsier", 120, 0.68),
    ("C004", "Enabling AI Compliance", "Enabler", 60, 0.79),
    ("C005", "Board-Level AI Briefing", "Evangelist", 30, 0.91),
];

/// Days allowed to finish a course after enrolling.
const COMPLETION_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnrollRequest {
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Build the training router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mvp4/training/courses", get(list_courses))
        .route("/api/v1/mvp4/training/enroll", post(enroll))
}

/// GET /api/v1/mvp4/training/courses - Course catalogue.
async fn list_courses() -> Json<Value> {
    let courses: Vec<Value> = COURSES
        .iter()
        .map(|(id, title, persona, duration, rate)| {
            json!({
                "id": id,
                "title": title,
                "persona": persona,
                "duration_min": duration,
                "completion_rate": rate,
            })
        })
        .collect();
    Json(json!({
        "courses": courses,
        "certifications_issued": 1247,
        "avg_score": 0.83,
    }))
}

/// POST /api/v1/mvp4/training/enroll - Enroll a user in a course.
async fn enroll(body: Result<Json<EnrollRequest>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let req = extract_json(body)?;
    let now = saro_core::now();
    let title = req
        .course_id
        .as_deref()
        .and_then(|id| COURSES.iter().find(|c| c.0 == id))
        .map(|c| c.1);
    tracing::info!(course_id = ?req.course_id, user_id = ?req.user_id, "training enrollment");

    Ok(Json(json!({
        "enrollment_id": uuid::Uuid::new_v4().to_string(),
        "course_id": req.course_id,
        "course_title": title,
        "user_id": req.user_id,
        "started_at": now,
        "estimated_completion": saro_core::date_in_days(now, COMPLETION_WINDOW_DAYS),
        "status": "enrolled",
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
    async fn five_courses() {
        let (_, body) = get_json(app(), "/api/v1/mvp4/training/courses").await;
        assert_eq!(body["courses"].as_array().unwrap().len(), 5);
        assert_eq!(body["courses"][1]["persona"], "Forecaster");
    }

    #[tokio::test]
    async fn enroll_resolves_course_title() {
        let (_, body) = post_json(
            app(),
            "/api/v1/mvp4/training/enroll",
            json!({ "course_id": "C002", "user_id": "u-1" }),
        )
        .await;
        assert_eq!(body["status"], "enrolled");
        assert_eq!(body["course_title"], "EU AI Act Deep Dive");
        assert_eq!(body["enrollment_id"].as_str().unwrap().len(), 36);
    }

    #[tokio::test]
    async fn enroll_without_fields_is_accepted() {
        let (_, body) = post_json(app(), "/api/v1/mvp4/training/enroll", json!({})).await;
        assert!(body["course_id"].is_null());
        assert!(body["course_title"].is_null());
    }
}
