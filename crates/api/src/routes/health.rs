use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness summary for load balancers and uptime probes.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Result of a `SELECT 1` round trip against the pool.
    pub db_healthy: bool,
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    /// Version baked in at compile time.
    pub version: &'static str,
}

impl HealthResponse {
    fn for_db(db_healthy: bool) -> Self {
        Self {
            db_healthy,
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// GET /health
///
/// Always answers 200 so a probe can tell "service down" (no response)
/// apart from "database down" (`db_healthy: false` in the body).
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_ok = cinevault_db::health_check(&state.pool).await.is_ok();
    Json(HealthResponse::for_db(db_ok))
}

/// Health lives at the server root, outside the versioned API prefix.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
