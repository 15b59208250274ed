//! The single JSON shape every response uses.
//!
//! ```json
//! { "success": true, "count": 2, "data": [ ... ] }
//! { "success": false, "errors": ["Age must be at least 16"] }
//! ```
//!
//! Unset members are omitted rather than sent as `null`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Diagnostic text, only on 500s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn fail() -> Self {
        Self::default()
    }

    /// A successful envelope around one serializable value.
    pub fn data<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::ok().with_data(serde_json::to_value(data)?))
    }

    /// A successful envelope around a list, with `count` set.
    pub fn list<T: Serialize>(items: &[T]) -> Result<Self, serde_json::Error> {
        let mut envelope = Self::data(&items)?;
        envelope.count = Some(items.len());
        Ok(envelope)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_status(self, status: StatusCode) -> (StatusCode, Json<Envelope>) {
        (status, Json(self))
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK).into_response()
    }
}
