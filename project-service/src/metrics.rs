use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct ProjectMetrics {
    registry: Registry,
    projects_created: IntCounter,
}

impl ProjectMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let projects_created = IntCounter::new("projects_created_total", "Projects persisted")?;
        registry.register(Box::new(projects_created.clone()))?;
        Ok(Self {
            registry,
            projects_created,
        })
    }

    pub fn project_created(&self) {
        self.projects_created.inc();
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
