use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable. Generation
    /// still works without a provider key, so the provider never degrades it.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Model the name generator calls.
    pub model: String,
    /// Whether checkouts can be opened with the payment provider.
    pub payments_configured: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = mingzi_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        model: state.orchestrator.model().to_string(),
        payments_configured: state.payments.is_configured(),
    })
}

/// Root-level routes, mounted outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
