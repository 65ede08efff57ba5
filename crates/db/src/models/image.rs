use serde::Serialize;
use sqlx::FromRow;

use cinevault_core::types::DbId;

/// A row from the `images` table.
///
/// Image rows are created freely per import and never deduplicated; each
/// one is owned by the single catalog entry that references it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    /// True when the URL is a TMDB-hosted asset path rather than a full
    /// locally-sourced URL.
    pub tmdb: bool,
    pub url: Option<String>,
}
