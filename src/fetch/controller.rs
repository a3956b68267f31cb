// src/fetch/controller.rs
// =============================================================================
// FetchController: one HTTP method, many on-demand requests, one state.
//
// How a call to fetch_data() plays out:
// 1. Bump the generation counter and publish Loading (before any await)
// 2. Resolve the endpoint against the base URL and build the request
// 3. Send it through the HttpClient and wait for the response
// 4. Turn the response (or the failure) into Success / Error
// 5. Publish that state, unless the controller was unmounted or, with
//    Sequencing::LatestIssued, a newer call has started since
//
// fetch_data() has no return value and never fails. Every problem becomes
// an Error state that subscribers see.
//
// Rust concepts:
// - tokio::sync::watch: a single value that many receivers can observe
// - Atomics: lock-free counters and flags shared across tasks
// - Arc<dyn Trait>: one shared HTTP client behind a trait object
// =============================================================================

use super::{FetchRequest, FetchState};
use crate::error::{FetchError, Result};
use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use url::Url;

/// What to do when calls on the same controller overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sequencing {
    /// No sequencing: whichever call settles last wins, even if it was
    /// issued first.
    #[default]
    LastSettled,
    /// Results of any call older than the most recently issued one are
    /// discarded.
    LatestIssued,
}

pub struct FetchController {
    client: Arc<dyn HttpClient>,
    method: HttpMethod,
    base_url: Option<Url>,
    headers: Vec<(String, String)>,
    sequencing: Sequencing,
    state: watch::Sender<FetchState>,
    generation: AtomicU64,
    mounted: AtomicBool,
}

impl FetchController {
    pub fn new(client: Arc<dyn HttpClient>, method: HttpMethod) -> Self {
        let (state, _) = watch::channel(FetchState::idle());
        Self {
            client,
            method,
            base_url: None,
            headers: Vec::new(),
            sequencing: Sequencing::default(),
            state,
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
        }
    }

    /// Relative endpoints ("/api/users") are joined onto this URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// A header sent with every request this controller makes.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {}", token))
    }

    pub fn with_sequencing(mut self, sequencing: Sequencing) -> Self {
        self.sequencing = sequencing;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// A receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Detaches the controller from its view.
    ///
    /// Requests already in flight still run to completion, but their
    /// results are dropped instead of published.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Issues one request and publishes its lifecycle.
    ///
    /// An unmounted controller ignores the call: nothing is sent and the
    /// last published state stays as it was.
    pub async fn fetch_data(&self, request: FetchRequest) {
        if !self.is_mounted() {
            tracing::debug!(endpoint = %request.endpoint, "Controller unmounted, not fetching");
            return;
        }

        // Claim a generation number first. LatestIssued compares against it
        // when the response comes back.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Loading goes out before the first await, so subscribers see it
        // even if the request fails immediately
        self.state.send_replace(FetchState::loading());

        tracing::debug!(
            method = %self.method,
            endpoint = %request.endpoint,
            generation,
            "Fetch started"
        );

        // Every failure path ends up as an Error state, never a panic or Err
        let outcome = match self.build_request(&request) {
            Ok(http_request) => match self.client.execute(&http_request).await {
                Ok(response) => interpret_response(response),
                Err(e) => FetchState::failed(e),
            },
            Err(e) => FetchState::failed(e),
        };

        if let Some(error) = &outcome.error {
            tracing::warn!(endpoint = %request.endpoint, error = %error, "Fetch failed");
        }

        self.settle(generation, &request.endpoint, outcome);
    }

    fn settle(&self, generation: u64, endpoint: &str, outcome: FetchState) {
        if !self.is_mounted() {
            tracing::debug!(endpoint, generation, "Controller unmounted, dropping result");
            return;
        }

        let sequencing = self.sequencing;
        let current = &self.generation;

        // The generation check runs inside send_if_modified, which holds the
        // channel's write lock. Two settling calls can't both pass it and
        // then overwrite each other out of order.
        let published = self.state.send_if_modified(|state| {
            // A newer call has started since this one; leave the state alone
            if sequencing == Sequencing::LatestIssued && current.load(Ordering::SeqCst) != generation
            {
                return false;
            }
            *state = outcome;
            true
        });

        if published {
            tracing::debug!(endpoint, generation, "Fetch settled");
        } else {
            tracing::debug!(endpoint, generation, "Superseded by a newer fetch, dropping result");
        }
    }

    fn build_request(&self, request: &FetchRequest) -> Result<HttpRequest> {
        let url = self.resolve(&request.endpoint)?;

        let body = if self.method.sends_body() {
            request.body.as_ref().map(Value::to_string)
        } else {
            None
        };

        Ok(HttpRequest {
            method: self.method,
            url,
            body,
            headers: self.headers.clone(),
        })
    }

    fn resolve(&self, endpoint: &str) -> Result<Url> {
        let invalid = |reason: String| FetchError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        if endpoint.trim().is_empty() {
            return Err(invalid("endpoint is required".to_string()));
        }

        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(endpoint).map_err(|e| invalid(e.to_string())),
                None => Err(invalid("relative endpoint without a base URL".to_string())),
            },
            Err(e) => Err(invalid(e.to_string())),
        }
    }
}

/// 2xx: decode the body (empty means null). Anything else: a remote failure
/// carrying the payload's message, if it has one.
fn interpret_response(response: HttpResponse) -> FetchState {
    if response.is_success() {
        if response.body.trim().is_empty() {
            return FetchState::success(Value::Null);
        }
        return match serde_json::from_str(&response.body) {
            Ok(data) => FetchState::success(data),
            Err(e) => FetchState::failed(FetchError::Decode(e.to_string())),
        };
    }

    FetchState::failed(FetchError::Remote {
        status: response.status,
        message: extract_message(&response.body),
    })
}

/// First non-blank string among the payload's `message` and `error` fields.
fn extract_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|field| {
            payload
                .get(field)?
                .as_str()
                // Blank counts as missing, so try the next field
                .filter(|message| !message.trim().is_empty())
        })
        .map(str::to_string)
}
