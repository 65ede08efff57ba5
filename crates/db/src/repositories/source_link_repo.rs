//! Repository for external source links (`src` table).

use sqlx::{PgPool, Postgres, Transaction};

use cinevault_core::types::DbId;

use crate::models::source_link::SourceLink;

/// Column list for `src` queries.
const COLUMNS: &str = "id, url";

/// Provides inserts and lookups for source-link rows.
pub struct SourceLinkRepo;

impl SourceLinkRepo {
    /// Insert one source-link row and return its generated id.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        url: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar("INSERT INTO src (url) VALUES ($1) RETURNING id")
            .bind(url)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a source-link row by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SourceLink>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM src WHERE id = $1");
        sqlx::query_as::<_, SourceLink>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of source-link rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM src")
            .fetch_one(pool)
            .await
    }
}
