use std::sync::Arc;

use mingzi_core::orchestrator::NameOrchestrator;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::payments::CreemClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is a pool, an `Arc`, or `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub pool: mingzi_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Runs generation batches against the configured provider.
    pub orchestrator: NameOrchestrator,
    pub payments: Arc<CreemClient>,
    /// Cancelled on shutdown; in-flight batches stop and return what they have.
    pub shutdown: CancellationToken,
}
