use serde::Serialize;
use sqlx::FromRow;

use cinevault_core::types::DbId;

/// A row from the `src` table: an external playback/source URL.
///
/// Same creation policy as image rows: created per import, never shared
/// across catalog entries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SourceLink {
    pub id: DbId,
    pub url: Option<String>,
}
