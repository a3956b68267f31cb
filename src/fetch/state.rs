// src/fetch/state.rs
// =============================================================================
// FetchState: everything a view needs to know about one request.
//
// Transitions:
//   Idle --fetch_data--> Loading --settle--> Success | Error
//   Success | Error --fetch_data--> Loading
//
// Invariant: data is only present on Success, error and message only on
// Error. The constructors below are the only way states are built, so the
// invariant holds by construction.
// =============================================================================

use crate::error::{FetchError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchState {
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_error")]
    pub error: Option<FetchError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchState {
    pub fn idle() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
            message: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: FetchStatus::Loading,
            ..Self::idle()
        }
    }

    pub fn success(data: Value) -> Self {
        Self {
            status: FetchStatus::Success,
            data: Some(data),
            ..Self::idle()
        }
    }

    pub fn failed(error: FetchError) -> Self {
        Self {
            status: FetchStatus::Error,
            message: Some(error.user_message()),
            error: Some(error),
            data: None,
        }
    }

    /// Success or Error
    pub fn is_settled(&self) -> bool {
        matches!(self.status, FetchStatus::Success | FetchStatus::Error)
    }

    /// Shape guard: decodes `data` into `T`.
    ///
    /// Fails with ShapeMismatch when there is no data or it has the wrong
    /// shape. `expected` names the schema in the error.
    pub fn parse<T: DeserializeOwned>(&self, expected: &'static str) -> Result<T> {
        let data = self.data.as_ref().ok_or_else(|| FetchError::ShapeMismatch {
            expected,
            reason: "no data has been loaded".to_string(),
        })?;

        T::deserialize(data).map_err(|e| FetchError::ShapeMismatch {
            expected,
            reason: e.to_string(),
        })
    }

    /// Like `parse`, but a failed guard simply means "no usable data".
    pub fn usable<T: DeserializeOwned>(&self) -> Option<T> {
        let data = self.data.as_ref()?;
        match T::deserialize(data) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, "Payload failed its shape guard");
                None
            }
        }
    }
}

impl Default for FetchState {
    fn default() -> Self {
        Self::idle()
    }
}

fn serialize_error<S: serde::Serializer>(
    error: &Option<FetchError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}
