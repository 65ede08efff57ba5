//! Catalog entry models.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use cinevault_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `movies` table.
///
/// `tmdb_id` is the caller-supplied external identifier and carries the
/// table's unique constraint; it governs import idempotency.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub tmdb_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    /// Caller rating scaled x10 and rounded (7.5 is stored as 75).
    pub rating: i32,
    pub release_date: Option<NaiveDate>,
    pub poster_img_id: Option<DbId>,
    pub backdrop_img_id: Option<DbId>,
    pub src_id: Option<DbId>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Fully-resolved values for one catalog insert: cleaned fields plus the
/// generated ids of the auxiliary rows inserted earlier in the same
/// transaction.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    pub rating: i32,
    pub release_date: Option<NaiveDate>,
    pub poster_img_id: Option<DbId>,
    pub backdrop_img_id: Option<DbId>,
    pub src_id: Option<DbId>,
}
