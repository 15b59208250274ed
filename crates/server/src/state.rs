use crate::config::ServerConfig;
use crate::error::ServerResult;
use roster::{StudentService, StudentStore};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Record operations over the configured store
    pub students: Arc<StudentService>,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl ServerState {
    /// Open the configured store and build the state around it.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = StudentStore::open(&config.store.backend_config())?;
        Ok(Self::with_service(config, StudentService::new(store)))
    }

    /// Build state around an existing service (e.g. in-memory for tests).
    pub fn with_service(config: ServerConfig, students: StudentService) -> Self {
        Self {
            config: Arc::new(config),
            students: Arc::new(students),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
