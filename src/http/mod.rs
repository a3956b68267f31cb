// src/http/mod.rs
// =============================================================================
// HTTP client abstraction.
//
// The fetch controller never talks to reqwest directly. It goes through the
// HttpClient trait so tests can swap in MockHttpClient and script exact
// responses, delays and race orderings without a network.
//
// Submodules:
// - method: the closed set of HTTP methods a controller can use
// - client: production implementation on top of reqwest
// - mock: scriptable implementation for tests
// =============================================================================

mod client;
mod method;
#[cfg(test)]
mod mock;

pub use client::ReqwestHttpClient;
pub use method::HttpMethod;
#[cfg(test)]
pub use mock::MockHttpClient;

use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// A fully resolved request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// JSON body, already serialized. Always None for GET.
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// Whatever came back, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for executing HTTP requests.
///
/// Implementations return `Ok` for every response they receive, whatever its
/// status. `Err` means no response at all (a transport failure).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}
