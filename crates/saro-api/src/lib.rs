//! # saro-api: Axum API Services for SARO
//!
//! SARO is an AI regulatory intelligence platform delivered in five
//! increments (MVP1 to MVP5). Every endpoint answers from in-memory stores
//! or simulated analysis; nothing is persisted across restarts.
//!
//! ## API Surface
//!
//! | Prefix                          | Module                     | Domain                      |
//! |---------------------------------|----------------------------|-----------------------------|
//! | `/`, `/health`, `/metrics`      | [`routes::health`]         | Banner, health, scrape      |
//! | `/api/v1/dashboard`, `/alerts`  | [`routes::dashboard`]      | Cross-MVP overview          |
//! | `/api/v1/mvp1/*`                | [`routes::ingestion`]      | Ingestion & forecasting     |
//! | `/api/v1/mvp2/*`                | [`routes::audit`]          | Audits & policy evaluation  |
//! | `/api/v1/mvp3/*`                | [`routes::enterprise`]     | Tenants & integrations      |
//! | `/api/v1/mvp4/guardrails/*`     | [`routes::guardrails`]     | Output guardrails           |
//! | `/api/v1/mvp4/compliance/*`     | [`routes::compliance`]     | Reports & regulations       |
//! | `/api/v1/mvp4/training/*`       | [`routes::training`]       | Courses                     |
//! | `/api/v1/mvp4/commercial/*`     | [`routes::commercial`]     | Onboarding & billing        |
//! | `/api/v1/mvp5/bots/*`           | [`routes::bots`]           | Remediation bots            |
//! | `/api/v1/mvp5/marketplace/*`    | [`routes::marketplace`]    | Model marketplace           |
//! | `/api/v1/mvp5/ethics/*`         | [`routes::ethics`]         | Ethics & surveillance       |
//! | `/api/v1/agent/*`               | [`routes::agent`]          | Agentic pipeline            |
//! | `/api/v1/audit-reports/*`       | [`routes::audit_reports`]  | Standards reports           |
//! | `/api/v1/model-output/*`        | [`routes::model_output`]   | Output checklists           |
//! | `/api/v1/policies/*`            | [`routes::policies`]       | Policy library & feed log   |
//! | `/api/v1/checklist/*`           | [`routes::checklist`]      | Persona workflows           |
//! | `/api/v1/personas`, `/onboard`  | [`routes::personas`]       | Personas                    |
//! | `/manifest.json`, `/api/v1/pwa` | [`routes::pwa`]            | Progressive web app         |
//!
//! The agent and bot routes are mounted only when `enable_agentic` is set;
//! the marketplace and blockchain verification routes only when
//! `enable_blockchain` is set.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros, served at `/openapi.json`.

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::cors::CorsLayer;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let mut api = Router::new()
        .merge(routes::health::router())
        .merge(routes::dashboard::router())
        .merge(routes::ingestion::router())
        .merge(routes::audit::router())
        .merge(routes::enterprise::router())
        .merge(routes::guardrails::router())
        .merge(routes::compliance::router())
        .merge(routes::training::router())
        .merge(routes::commercial::router())
        .merge(routes::ethics::router())
        .merge(routes::audit_reports::router())
        .merge(routes::model_output::router())
        .merge(routes::policies::router())
        .merge(routes::checklist::router())
        .merge(routes::personas::router())
        .merge(routes::pwa::router())
        .merge(openapi::router());

    if state.config.enable_agentic {
        api = api.merge(routes::agent::router()).merge(routes::bots::router());
    }
    if state.config.enable_blockchain {
        api = api
            .merge(routes::marketplace::router())
            .merge(routes::compliance::blockchain_router());
    }

    let metrics = state.metrics.clone();
    let api = api
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(metrics))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Probes sit outside the metrics layer.
    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(probes).merge(api)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the router is assembled.
async fn readiness() -> &'static str {
    "ready"
}
