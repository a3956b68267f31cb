// src/fetch/request.rs
// The per-call input to FetchController::fetch_data.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// A path like "/api/users" (resolved against the base URL) or a full URL
    pub endpoint: String,
    /// JSON payload for POST/PUT/PATCH/DELETE. Ignored for GET.
    pub body: Option<Value>,
}

impl FetchRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}
