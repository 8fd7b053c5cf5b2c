use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    auth_decisions: IntCounterVec,
    upstream_requests: IntCounterVec,
    upstream_failures: IntCounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let auth_decisions = IntCounterVec::new(
            Opts::new(
                "gateway_auth_decisions_total",
                "Authorization decisions grouped by outcome",
            ),
            &["outcome"],
        )?;
        let upstream_requests = IntCounterVec::new(
            Opts::new(
                "gateway_upstream_requests_total",
                "Requests forwarded upstream grouped by upstream and status",
            ),
            &["upstream", "status"],
        )?;
        let upstream_failures = IntCounterVec::new(
            Opts::new(
                "gateway_upstream_failures_total",
                "Forwarding attempts that failed before a response arrived",
            ),
            &["upstream"],
        )?;
        registry.register(Box::new(auth_decisions.clone()))?;
        registry.register(Box::new(upstream_requests.clone()))?;
        registry.register(Box::new(upstream_failures.clone()))?;
        Ok(Self {
            registry,
            auth_decisions,
            upstream_requests,
            upstream_failures,
        })
    }

    pub fn record_decision(&self, outcome: &str) {
        self.auth_decisions.with_label_values(&[outcome]).inc();
    }

    pub fn decision_count(&self, outcome: &str) -> u64 {
        self.auth_decisions.with_label_values(&[outcome]).get()
    }

    pub fn record_upstream(&self, upstream: &str, status: StatusCode) {
        self.upstream_requests
            .with_label_values(&[upstream, status.as_str()])
            .inc();
    }

    pub fn record_upstream_failure(&self, upstream: &str) {
        self.upstream_failures.with_label_values(&[upstream]).inc();
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
