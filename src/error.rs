// src/error.rs
// =============================================================================
// Error types for the fetch layer.
//
// Every way a request can go wrong ends up as a FetchError. The controller
// never returns these to its caller: it stores them in FetchState instead,
// so a view only ever sees "this panel failed, here is the message".
//
// Taxonomy:
// - Transport: the request could not be sent or no response came back
// - Remote: a response came back with a non-2xx status
// - Decode: a 2xx response whose body is not JSON
// - InvalidEndpoint: the endpoint could not be turned into a URL
// - ShapeMismatch: data arrived but does not fit the schema a view expects
//
// Rust concepts:
// - thiserror: derive Display and Error for an enum
// - Clone: errors are stored in state and broadcast to every subscriber
// =============================================================================

use thiserror::Error;

/// Message shown when a failure carries nothing more specific.
pub const FALLBACK_MESSAGE: &str = "Something went wrong, please try again";

/// Result type alias for the fetch layer.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Everything that can go wrong between "fetch this" and "here is your data".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response was received (connection refused, DNS, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Server responded with HTTP {status}")]
    Remote {
        status: u16,
        /// The `message` (or `error`) field of the response payload, if any
        message: Option<String>,
    },

    /// The server answered 2xx but the body is not JSON
    #[error("Response body is not valid JSON: {0}")]
    Decode(String),

    /// The endpoint could not be resolved into a URL
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The payload does not match the shape the caller expected
    #[error("Response does not match the expected {expected} shape: {reason}")]
    ShapeMismatch {
        expected: &'static str,
        reason: String,
    },
}

impl FetchError {
    /// The human-readable message a view should display for this failure.
    ///
    /// Only a remote failure can carry a server-supplied message; every
    /// other case falls back to FALLBACK_MESSAGE.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Remote {
                message: Some(message),
                ..
            } => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Transport(error.to_string())
    }
}
