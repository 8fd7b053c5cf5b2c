use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct ClientMetrics {
    registry: Registry,
    projects_created: IntCounter,
    link_divergence: IntCounterVec,
}

impl ClientMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let projects_created = IntCounter::new(
            "client_projects_created_total",
            "Projects created remotely and linked to a client profile",
        )?;
        registry.register(Box::new(projects_created.clone()))?;

        let link_divergence = IntCounterVec::new(
            Opts::new(
                "client_project_link_divergence_total",
                "Remote projects left unlinked after the local update failed",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(link_divergence.clone()))?;

        Ok(Self {
            registry,
            projects_created,
            link_divergence,
        })
    }

    pub fn project_created(&self) {
        self.projects_created.inc();
    }

    pub fn link_divergence(&self, reason: &str) {
        self.link_divergence.with_label_values(&[reason]).inc();
    }

    pub fn divergence_count(&self, reason: &str) -> u64 {
        self.link_divergence.with_label_values(&[reason]).get()
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let mut metric_families = self.registry.gather();
        metric_families.extend(prometheus::gather());
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
