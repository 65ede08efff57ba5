pub mod health;
pub mod images;
pub mod import;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Everything mounted under `/api/v1`:
///
/// ```text
/// /import/movies      bulk import (POST, JSON body or multipart file)
///                     connectivity probe (GET ?ping)
/// /images/compress    re-encode a base64 image (POST)
/// /images/upload      proxy an image to the external host (POST)
/// /library            client-side library acknowledgement (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Bulk catalog import.
        .nest("/import", import::router())
        // Image re-encoding and upload proxy.
        .nest("/images", images::router())
        // The user library lives client-side; see the handler.
        .route("/library", get(handlers::library::get_library))
}
