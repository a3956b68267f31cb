// src/http/mock.rs
// =============================================================================
// Mock HTTP client for tests.
//
// Responses are queued per "{METHOD} {path}" key and handed out in FIFO
// order. A response can be immediate, delayed by a fixed duration, or held
// until the test fires a trigger, which is how the race tests decide which
// of two overlapping requests settles last.
// =============================================================================

use super::{HttpClient, HttpRequest, HttpResponse};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, Vec<MockResponse>>>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
    in_flight: Arc<AtomicUsize>,
}

enum MockResponse {
    Immediate(Result<HttpResponse>),
    Delayed(Result<HttpResponse>, Duration),
    /// Waits for the trigger to fire (or be dropped) before completing
    Triggered(Result<HttpResponse>, oneshot::Receiver<()>),
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&self, key: &str, response: Result<HttpResponse>) {
        self.push(key, MockResponse::Immediate(response));
    }

    pub fn add_delayed_response(&self, key: &str, response: Result<HttpResponse>, delay: Duration) {
        self.push(key, MockResponse::Delayed(response, delay));
    }

    /// Queues a response that only completes once the returned sender fires.
    pub fn add_response_with_trigger(
        &self,
        key: &str,
        response: Result<HttpResponse>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(key, MockResponse::Triggered(response, rx));
        tx
    }

    pub fn get_calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn push(&self, key: &str, response: MockResponse) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push(response);
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        // The guard undoes this increment however execute() ends
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard {
            in_flight: self.in_flight.clone(),
        };

        self.calls.lock().push(request.clone());

        // Keyed on path only, so absolute URLs on other hosts still match
        let key = format!("{} {}", request.method, request.url.path());

        // Pop under the lock, then release it before awaiting anything
        let mock_response = {
            let mut responses = self.responses.lock();
            responses
                .get_mut(&key)
                .filter(|queue| !queue.is_empty())
                .map(|queue| queue.remove(0))
        };

        match mock_response {
            Some(MockResponse::Immediate(response)) => response,
            Some(MockResponse::Delayed(response, delay)) => {
                tokio::time::sleep(delay).await;
                response
            }
            Some(MockResponse::Triggered(response, trigger)) => {
                // A dropped sender releases the response too
                let _ = trigger.await;
                response
            }
            None => Err(FetchError::Transport(format!(
                "No mock response configured for {}",
                key
            ))),
        }
    }
}

/// Decrements the in-flight counter even if the request future is dropped.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use url::Url;

    fn get(path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: Url::parse("http://localhost:3000").unwrap().join(path).unwrap(),
            body: None,
            headers: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_responses_are_fifo() {
        let mock = MockHttpClient::new();
        mock.add_response("GET /api/users", Ok(HttpResponse::new(200, "first")));
        mock.add_response("GET /api/users", Ok(HttpResponse::new(200, "second")));

        let request = get("/api/users");
        assert_eq!(mock.execute(&request).await.unwrap().body, "first");
        assert_eq!(mock.execute(&request).await.unwrap().body, "second");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unconfigured_key_is_a_transport_error() {
        let mock = MockHttpClient::new();
        let result = mock.execute(&get("/api/unknown")).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_triggered_response_waits() {
        let mock = MockHttpClient::new();
        let trigger =
            mock.add_response_with_trigger("GET /api/commits", Ok(HttpResponse::new(200, "[]")));

        let mock_clone = mock.clone();
        let handle = tokio::spawn(async move { mock_clone.execute(&get("/api/commits")).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());
        assert_eq!(mock.in_flight_count(), 1);

        trigger.send(()).unwrap();
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.body, "[]");
        assert_eq!(mock.in_flight_count(), 0);
    }
}
