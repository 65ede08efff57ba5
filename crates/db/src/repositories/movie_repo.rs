//! Repository for catalog entries (`movies` table).

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::movie::{Movie, NewMovie};

/// Column list for `movies` queries.
const COLUMNS: &str = "id, tmdb_id, title, overview, genres, rating, release_date, \
     poster_img_id, backdrop_img_id, src_id, created_at";

/// Provides catalog queries and the conflict-avoiding insert.
pub struct MovieRepo;

impl MovieRepo {
    /// Check whether a catalog entry with this external identifier exists.
    ///
    /// Runs inside the chunk transaction so the answer is consistent with
    /// the writes that follow it.
    pub async fn exists(
        tx: &mut Transaction<'_, Postgres>,
        tmdb_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<i32> = sqlx::query_scalar("SELECT 1 FROM movies WHERE tmdb_id = $1")
            .bind(tmdb_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }

    /// Insert a catalog entry unless its external identifier already exists.
    ///
    /// The insert is atomic: a conflicting `tmdb_id` makes it a no-op
    /// reported as `false` (zero rows affected), never an error. This is
    /// the idempotency guarantee that makes batch re-submission safe and
    /// closes the check-then-insert race between concurrent imports.
    pub async fn insert_if_absent(
        tx: &mut Transaction<'_, Postgres>,
        input: &NewMovie,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO movies \
                (tmdb_id, title, overview, genres, rating, release_date, \
                 poster_img_id, backdrop_img_id, src_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (tmdb_id) DO NOTHING",
        )
        .bind(input.tmdb_id)
        .bind(&input.title)
        .bind(&input.overview)
        .bind(&input.genres)
        .bind(input.rating)
        .bind(input.release_date)
        .bind(input.poster_img_id)
        .bind(input.backdrop_img_id)
        .bind(input.src_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a catalog entry by its external identifier.
    pub async fn find_by_tmdb_id(
        pool: &PgPool,
        tmdb_id: i64,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM movies WHERE tmdb_id = $1");
        sqlx::query_as::<_, Movie>(&sql)
            .bind(tmdb_id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of catalog entries.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(pool)
            .await
    }
}
