use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount the image utility routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compress", post(handlers::images::compress_image))
        .route("/upload", post(handlers::images::upload_image))
}
