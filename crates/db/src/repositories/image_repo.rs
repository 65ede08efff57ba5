//! Repository for auxiliary image rows (`images` table).

use sqlx::{PgPool, Postgres, Transaction};

use cinevault_core::types::DbId;

use crate::models::image::Image;

/// Column list for `images` queries.
const COLUMNS: &str = "id, tmdb, url";

/// Provides inserts and lookups for image rows.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert one image row and return its generated id.
    ///
    /// No dedup happens at this layer: every call creates a fresh row,
    /// even for a URL that already exists elsewhere. A null URL is legal
    /// (see the missing-poster policy).
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        tmdb: bool,
        url: Option<&str>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO images (tmdb, url) VALUES ($1, $2) RETURNING id")
            .bind(tmdb)
            .bind(url)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an image row by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of image rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(pool)
            .await
    }
}
