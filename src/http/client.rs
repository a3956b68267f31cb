// src/http/client.rs
// =============================================================================
// Production HTTP client built on reqwest.
//
// One client is created in main() and shared by every controller, so all
// requests reuse the same connection pool.
// =============================================================================

use super::{HttpClient, HttpRequest, HttpResponse};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("squares/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut req = self
            .client
            .request(request.method.into(), request.url.clone());

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            req = req
                .header("Content-Type", "application/json")
                .body(body.clone());
            tracing::trace!(body_len = body.len(), "Added request body");
        }

        let response = req.send().await.map_err(|e| {
            tracing::warn!(error = %e, "HTTP request failed");
            FetchError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::info!(status, response_len = body.len(), "HTTP request completed");

        Ok(HttpResponse::new(status, body))
    }
}
