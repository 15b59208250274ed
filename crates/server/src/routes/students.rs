//! Student record endpoints.
//!
//! Store calls can touch disk (redb commits synchronously), so every service
//! call runs on the blocking pool rather than on a runtime worker.

use crate::envelope::Envelope;
use crate::error::{ServerError, ServerResult};
use crate::extract::{JsonBody, PathParam, StudentId};
use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use roster::{RecordResult, StudentInput, StudentService};
use serde_json::json;
use std::sync::Arc;

/// Run one service call off the async workers.
async fn run<T, F>(state: &ServerState, op: F) -> ServerResult<T>
where
    F: FnOnce(&StudentService) -> RecordResult<T> + Send + 'static,
    T: Send + 'static,
{
    let students = Arc::clone(&state.students);
    tokio::task::spawn_blocking(move || op(&students))
        .await
        .map_err(|e| ServerError::Internal(format!("store task failed: {e}")))?
        .map_err(ServerError::from)
}

/// GET /api/students
pub async fn list_students(State(state): State<Arc<ServerState>>) -> ServerResult<Envelope> {
    let students = run(&state, |s| s.list_all()).await?;
    Ok(Envelope::list(&students)?)
}

/// GET /api/students/{id}
pub async fn get_student(
    State(state): State<Arc<ServerState>>,
    StudentId(id): StudentId,
) -> ServerResult<Envelope> {
    let student = run(&state, move |s| s.get(&id.to_string())).await?;
    Ok(Envelope::data(&student)?)
}

/// POST /api/students
pub async fn create_student(
    State(state): State<Arc<ServerState>>,
    JsonBody(input): JsonBody<StudentInput>,
) -> ServerResult<(StatusCode, Json<Envelope>)> {
    let student = run(&state, move |s| s.create(&input)).await?;
    Ok(Envelope::data(&student)?.with_status(StatusCode::CREATED))
}

/// PUT /api/students/{id}
pub async fn update_student(
    State(state): State<Arc<ServerState>>,
    StudentId(id): StudentId,
    JsonBody(input): JsonBody<StudentInput>,
) -> ServerResult<Envelope> {
    let student = run(&state, move |s| s.update(&id.to_string(), &input)).await?;
    Ok(Envelope::data(&student)?)
}

/// DELETE /api/students/{id}
pub async fn delete_student(
    State(state): State<Arc<ServerState>>,
    StudentId(id): StudentId,
) -> ServerResult<Envelope> {
    run(&state, move |s| s.delete(&id.to_string())).await?;
    Ok(Envelope::ok()
        .with_data(json!({}))
        .with_message("Student deleted successfully"))
}

/// GET /api/students/course/{course}
pub async fn students_by_course(
    State(state): State<Arc<ServerState>>,
    PathParam(course): PathParam<String>,
) -> ServerResult<Envelope> {
    let students = run(&state, move |s| s.list_by_course(&course)).await?;
    Ok(Envelope::list(&students)?)
}
