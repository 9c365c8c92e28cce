//! Portfolio Q&A Service: binary entrypoint
//! Boots the Axum HTTP server with the question service, Prometheus metrics and CORS.
//!
//! See `README.md` for configuration and routes.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing::error;

use portfolio_qa::config::AppConfig;
use portfolio_qa::metrics::Metrics;
use portfolio_qa::{router, telemetry, AppState};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();

    let cfg = AppConfig::from_env();
    let service = cfg.build_service().inspect_err(|e| {
        error!(target: "portfolio_qa", error = %format!("{e:#}"), "startup failed");
    })?;

    let metrics = Metrics::init(service.catalog().len()).context("metrics init")?;

    let app = router(AppState::new(service)).merge(metrics.router());

    Ok(app.into())
}
