//! Handler for the user library acknowledgement endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LibraryResponse {
    pub success: bool,
    pub message: &'static str,
}

/// GET /api/v1/library
///
/// The catalog UI keeps each user's library client-side (localStorage,
/// capped, oldest evicted first). This endpoint exists so clients probing
/// for server-side storage get a stable answer instead of a 404.
pub async fn get_library() -> Json<LibraryResponse> {
    Json(LibraryResponse {
        success: true,
        message: "Library is stored client-side (localStorage). Implement server storage if needed.",
    })
}
