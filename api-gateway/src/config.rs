use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub user_service_url: String,
    pub client_service_url: String,
    pub freelancer_service_url: String,
    pub project_service_url: String,
    pub quiz_service_url: Option<String>,
    pub upstream_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub allowed_origins: Vec<String>,
}

/// Upstream chosen for a request by its first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upstream<'a> {
    pub name: &'static str,
    pub base_url: &'a str,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("invalid PORT '{value}'"))?,
            Err(_) => 8080,
        };
        let upstream_timeout_secs = env::var("SERVICE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(10);
        let max_body_bytes = env::var("GATEWAY_MAX_BODY_BYTES")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(2 * 1024 * 1024);
        let allowed_origins = env::var("GATEWAY_ALLOWED_ORIGINS")
            .map(|csv| {
                csv.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            user_service_url: env::var("USER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            client_service_url: env::var("CLIENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8082".to_string()),
            freelancer_service_url: env::var("FREELANCER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8083".to_string()),
            project_service_url: env::var("PROJECT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8084".to_string()),
            quiz_service_url: env::var("QUIZ_SERVICE_URL").ok(),
            upstream_timeout_secs: upstream_timeout_secs.max(1),
            max_body_bytes,
            allowed_origins,
        })
    }

    /// Local defaults, used by tests to point upstreams at stub servers.
    pub fn with_upstreams(
        user: impl Into<String>,
        client: impl Into<String>,
        freelancer: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            user_service_url: user.into(),
            client_service_url: client.into(),
            freelancer_service_url: freelancer.into(),
            project_service_url: project.into(),
            quiz_service_url: None,
            upstream_timeout_secs: 10,
            max_body_bytes: 2 * 1024 * 1024,
            allowed_origins: Vec::new(),
        }
    }

    pub fn upstream_for(&self, path: &str) -> Option<Upstream<'_>> {
        let segment = path.strip_prefix('/')?.split('/').next()?;
        let (name, base_url) = match segment {
            "users" => ("user-service", self.user_service_url.as_str()),
            "clients" => ("client-service", self.client_service_url.as_str()),
            "freelancers" => ("freelancer-service", self.freelancer_service_url.as_str()),
            "projects" => ("project-service", self.project_service_url.as_str()),
            "quiz" => ("quiz-service", self.quiz_service_url.as_deref()?),
            _ => return None,
        };
        Some(Upstream { name, base_url })
    }
}
