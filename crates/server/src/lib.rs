//! Student Record Server - HTTP REST API over the `roster` store
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /api/students` - List all students, newest first
//! - `POST /api/students` - Create a student
//! - `GET /api/students/{id}` - Get one student
//! - `PUT /api/students/{id}` - Update supplied fields of a student
//! - `DELETE /api/students/{id}` - Delete a student
//! - `GET /api/students/course/{course}` - List students in a course
//!
//! Every `/api` response body is an [`Envelope`]. Unmatched routes answer
//! `404 {"success": false, "message": "Route not found"}`.

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ServerConfig, StoreKind, StoreSettings};
pub use envelope::Envelope;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
