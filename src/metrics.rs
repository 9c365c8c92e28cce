// src/metrics.rs
use anyhow::Context;
use axum::{extract::State, routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and publish the catalog size gauge.
    pub fn init(catalog_size: usize) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("qa_questions_total", "Answered questions by status");
        describe_counter!("qa_confidence_total", "Catalog matches by confidence tier");
        describe_counter!("qa_invalid_requests_total", "Rejected question requests");

        gauge!("qa_catalog_answers").set(catalog_size as f64);

        Ok(Self { handle })
    }

    /// `GET /metrics` in the Prometheus text format; merge into the app router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(render))
            .with_state(self.handle.clone())
    }
}

async fn render(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
