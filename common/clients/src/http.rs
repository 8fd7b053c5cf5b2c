use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// JSON-over-HTTP caller for one upstream service.
#[derive(Clone, Debug)]
pub struct HttpRpc {
    service: &'static str,
    base_url: String,
    client: Client,
}

impl HttpRpc {
    pub fn new(service: &'static str, base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Transport {
                service,
                message: err.to_string(),
            })?;
        Ok(Self::with_client(service, base_url, client))
    }

    pub fn with_client(service: &'static str, base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            service,
            base_url,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Send the request and decode a 2xx JSON body.
    pub async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let service = self.service;
        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                ClientError::Timeout { service }
            } else {
                ClientError::Transport {
                    service,
                    message: err.to_string(),
                }
            }
        })?;

        let status = response.status();
        debug!(service, status = status.as_u16(), "upstream responded");
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { service });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                service,
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|err| {
            if err.is_timeout() {
                ClientError::Timeout { service }
            } else {
                ClientError::Decode {
                    service,
                    message: err.to_string(),
                }
            }
        })
    }
}
