use std::sync::Arc;

use crate::config::ServerConfig;

/// Handler state, cloned by Axum once per request.
///
/// Every field is cheap to clone: the pool and the reqwest client are
/// reference counted internally and the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Postgres pool; the import engine checks a connection out per call.
    pub pool: cinevault_db::DbPool,
    /// Settings read from the environment at boot (import tuning,
    /// image-host endpoint, CORS allow-list).
    pub config: Arc<ServerConfig>,
    /// Outbound client for the image-host proxy, shared so uploads reuse
    /// pooled connections.
    pub http: reqwest::Client,
}
