use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount the bulk import routes.
///
/// The single route answers GET (connectivity probe), POST (the import
/// itself), and everything else with a 405 naming the expected method.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/movies",
        get(handlers::import::import_probe)
            .post(handlers::import::import_movies)
            .fallback(handlers::import::method_not_allowed),
    )
}
