// src/fetch/context.rs
// =============================================================================
// FetchContext: the shared pieces every controller in the process needs.
//
// main() builds one context (one HTTP client, one base URL, one optional
// token) and passes it down to the views. Views ask it for controllers
// instead of reaching for a global.
// =============================================================================

use super::{FetchController, Sequencing};
use crate::http::{HttpClient, HttpMethod};
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct FetchContext {
    client: Arc<dyn HttpClient>,
    base_url: Url,
    token: Option<String>,
    sequencing: Sequencing,
}

impl FetchContext {
    pub fn new(client: Arc<dyn HttpClient>, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            token: None,
            sequencing: Sequencing::default(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_sequencing(mut self, sequencing: Sequencing) -> Self {
        self.sequencing = sequencing;
        self
    }

    /// A fresh controller with its own idle state.
    pub fn controller(&self, method: HttpMethod) -> FetchController {
        let controller = FetchController::new(self.client.clone(), method)
            .with_base_url(self.base_url.clone())
            .with_sequencing(self.sequencing);

        match &self.token {
            Some(token) => controller.with_bearer_token(token),
            None => controller,
        }
    }
}
