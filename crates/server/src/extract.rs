use crate::error::ServerError;
use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use roster::RecordError;
use uuid::Uuid;

/// `axum::Json`, but a body that fails to parse becomes a 400 envelope
/// instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` with envelope rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ServerError))]
pub struct PathParam<T>(pub T);

/// The `{id}` segment of a student route, parsed as a UUID.
///
/// Path extractors run before the body is read, so a malformed id is reported
/// as such even when the body is missing or invalid.
#[derive(Debug, Clone, Copy)]
pub struct StudentId(pub Uuid);

impl<S> FromRequestParts<S> for StudentId
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| RecordError::MalformedId)?;
        Uuid::parse_str(&raw)
            .map(StudentId)
            .map_err(|_| RecordError::MalformedId.into())
    }
}
