//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `students`: the student record endpoints under `/api/students`

pub mod health;
pub mod students;

use crate::envelope::Envelope;
use crate::error::ServerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};
use serde_json::json;
use std::any::Any;

/// Service metadata and endpoint listing (GET /).
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Student Record API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "listStudents": "GET /api/students",
            "createStudent": "POST /api/students",
            "getStudent": "GET /api/students/{id}",
            "updateStudent": "PUT /api/students/{id}",
            "deleteStudent": "DELETE /api/students/{id}",
            "studentsByCourse": "GET /api/students/course/{course}",
            "health": "GET /health",
            "ready": "GET /ready"
        }
    }))
}

/// 404 for unmatched paths and methods.
pub async fn not_found() -> ServerError {
    ServerError::RouteNotFound
}

/// Maps errors from the timeout layer onto the envelope.
pub async fn handle_timeout(err: BoxError) -> ServerError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ServerError::Timeout
    } else {
        ServerError::Internal(err.to_string())
    }
}

/// Turns a handler panic into the standard 500 envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(error = %detail, "handler panicked");

    Envelope::fail()
        .with_message("Server Error")
        .with_error(detail)
        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        .into_response()
}
