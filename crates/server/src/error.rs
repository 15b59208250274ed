use crate::envelope::Envelope;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster::RecordError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("Invalid URL: {0}")]
    InvalidPath(String),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Request timed out")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Record(RecordError::Validation(_))
            | ServerError::Record(RecordError::MalformedId)
            | ServerError::Record(RecordError::EmailConflict)
            | ServerError::InvalidJson(_)
            | ServerError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ServerError::Record(RecordError::NotFound) | ServerError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            ServerError::Record(RecordError::Store(_))
            | ServerError::Timeout
            | ServerError::Internal(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shape this error into the response envelope.
    pub fn envelope(&self) -> Envelope {
        match self {
            ServerError::Record(RecordError::Validation(errors)) => {
                Envelope::fail().with_errors(errors.messages().to_vec())
            }
            ServerError::Record(err @ RecordError::NotFound)
            | ServerError::Record(err @ RecordError::MalformedId)
            | ServerError::Record(err @ RecordError::EmailConflict) => {
                Envelope::fail().with_message(err.to_string())
            }
            ServerError::InvalidJson(detail) => Envelope::fail()
                .with_message("Invalid JSON payload")
                .with_errors(vec![detail.clone()]),
            ServerError::InvalidPath(detail) => Envelope::fail()
                .with_message("Invalid URL")
                .with_errors(vec![detail.clone()]),
            ServerError::RouteNotFound => Envelope::fail().with_message("Route not found"),
            ServerError::Timeout => server_error(self.to_string()),
            ServerError::Record(RecordError::Store(err)) => server_error(err.to_string()),
            ServerError::Internal(detail) | ServerError::Config(detail) => {
                server_error(detail.clone())
            }
        }
    }
}

fn server_error(detail: String) -> Envelope {
    Envelope::fail()
        .with_message("Server Error")
        .with_error(detail)
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "request rejected");
        }

        self.envelope().with_status(status).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidJson(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        ServerError::InvalidPath(rejection.body_text())
    }
}

impl From<roster::StoreError> for ServerError {
    fn from(err: roster::StoreError) -> Self {
        ServerError::Record(err.into())
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(format!("JSON encode error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
