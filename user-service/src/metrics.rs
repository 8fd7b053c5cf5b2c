use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct UserMetrics {
    registry: Registry,
    login_attempts: IntCounterVec,
    registrations: IntCounterVec,
    provisioning_divergence: IntCounterVec,
}

impl UserMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let login_attempts = IntCounterVec::new(
            Opts::new(
                "user_login_attempts_total",
                "Count of login attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts.clone()))?;

        let registrations = IntCounterVec::new(
            Opts::new(
                "user_registrations_total",
                "Identity records created grouped by role",
            ),
            &["role"],
        )?;
        registry.register(Box::new(registrations.clone()))?;

        let provisioning_divergence = IntCounterVec::new(
            Opts::new(
                "user_provisioning_divergence_total",
                "Identity records left without a profile after a failed profile call",
            ),
            &["role"],
        )?;
        registry.register(Box::new(provisioning_divergence.clone()))?;

        Ok(Self {
            registry,
            login_attempts,
            registrations,
            provisioning_divergence,
        })
    }

    pub fn login_attempt(&self, outcome: &str) {
        self.login_attempts.with_label_values(&[outcome]).inc();
    }

    pub fn registration(&self, role: &str) {
        self.registrations.with_label_values(&[role]).inc();
    }

    pub fn provisioning_divergence(&self, role: &str) {
        self.provisioning_divergence.with_label_values(&[role]).inc();
    }

    pub fn divergence_count(&self, role: &str) -> u64 {
        self.provisioning_divergence.with_label_values(&[role]).get()
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
