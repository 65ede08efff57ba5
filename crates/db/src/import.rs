//! Transactional batch import engine.
//!
//! [`run_import`] partitions a batch into fixed-size chunks, runs one
//! transaction per chunk, and contains persistence failures at chunk
//! granularity: a failing chunk rolls back in full while the chunks before
//! and after it proceed. Validation failures and duplicates are per-row
//! skips inside the running transaction, never errors. Atomicity is
//! chunk-granular by contract, neither whole-batch nor per-row.

use std::time::Duration;

use sqlx::{Connection, PgConnection, Postgres, Transaction};

use cinevault_core::record::{chunk_count, ImportOptions, ImportRecord, MissingPosterPolicy};

use crate::models::movie::NewMovie;
use crate::repositories::{ImageRepo, MovieRepo, SourceLinkRepo};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Aggregate outcome of one import invocation.
///
/// `logs` is the ordered human-readable trace returned to the caller:
/// connection establishment, chunk boundaries, per-row outcomes, chunk
/// commits/rollbacks, and final totals.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Rows committed to the catalog.
    pub inserted: u32,
    /// Records deliberately not persisted (invalid or duplicate).
    pub skipped: u32,
    /// Chunks rolled back by a persistence-layer error.
    pub failed_chunks: u32,
    /// Ordered trace of the run.
    pub logs: Vec<String>,
}

impl ImportReport {
    /// True when every chunk committed.
    pub fn success(&self) -> bool {
        self.failed_chunks == 0
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Run a batch import.
///
/// Returns `Err` only for setup failures: no connection could be acquired
/// before any work started. Once a connection is held, every persistence
/// failure is contained to its chunk and recorded in the report instead.
pub async fn run_import(
    pool: &DbPool,
    mut records: Vec<ImportRecord>,
    options: &ImportOptions,
) -> Result<ImportReport, sqlx::Error> {
    let mut report = ImportReport::default();

    // One connection for the whole invocation; the pool guard returns it
    // on every exit path.
    let mut conn = pool.acquire().await?;
    report.logs.push("DB connected".to_string());

    if let Some(cap) = options.max_records {
        if records.len() > cap {
            report.logs.push(format!(
                "Capped batch to {cap} records ({} submitted)",
                records.len()
            ));
            records.truncate(cap);
        }
    }

    // chunks(0) would panic
    let size = options.chunk_size.max(1);
    let total = chunk_count(records.len(), size);
    tracing::debug!(records = records.len(), chunks = total, "starting import");

    for (index, chunk) in records.chunks(size).enumerate() {
        let label = format!("Chunk {}/{total}", index + 1);
        report
            .logs
            .push(format!("{label}: begin ({} records)", chunk.len()));

        match run_chunk(&mut conn, chunk, index * size, options, &mut report).await {
            Ok(inserted) => {
                report.inserted += inserted;
                report.logs.push(format!("{label}: committed"));
                tracing::info!(chunk = index + 1, total, inserted, "import chunk committed");
            }
            Err(err) => {
                report.failed_chunks += 1;
                report.logs.push(format!("{label}: rolled back ({err})"));
                tracing::warn!(
                    chunk = index + 1,
                    total,
                    error = %err,
                    "import chunk rolled back"
                );
            }
        }

        // Cooperative pacing between chunks, not after the last one.
        if options.chunk_pause_ms > 0 && index + 1 < total {
            tokio::time::sleep(Duration::from_millis(options.chunk_pause_ms)).await;
        }
    }

    report.logs.push(format!(
        "Done: inserted={} skipped={} failed_chunks={}",
        report.inserted, report.skipped, report.failed_chunks
    ));
    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        failed_chunks = report.failed_chunks,
        "import finished"
    );

    Ok(report)
}

/// Run one chunk inside its own transaction, returning the rows it
/// inserted.
///
/// Skips are counted into the report immediately; the inserted count is
/// folded in by the caller only after the commit succeeds. On error the
/// transaction is dropped uncommitted, undoing every row written since the
/// chunk began.
async fn run_chunk(
    conn: &mut PgConnection,
    chunk: &[ImportRecord],
    offset: usize,
    options: &ImportOptions,
    report: &mut ImportReport,
) -> Result<u32, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let mut inserted = 0u32;

    for (i, record) in chunk.iter().enumerate() {
        let position = offset + i + 1;

        let (tmdb_id, title) = match record.validate() {
            Ok(identity) => identity,
            Err(reason) => {
                report.skipped += 1;
                report
                    .logs
                    .push(format!("Skipped (missing fields): record {position} ({reason})"));
                continue;
            }
        };

        if MovieRepo::exists(&mut tx, tmdb_id).await? {
            report.skipped += 1;
            report
                .logs
                .push(format!("Skipped (duplicate): tmdb_id {tmdb_id}"));
            continue;
        }

        let row = resolve_record(&mut tx, record, tmdb_id, title, options).await?;

        // A concurrent import that won the race between the exists check
        // and this insert surfaces as zero rows affected, not an error.
        if MovieRepo::insert_if_absent(&mut tx, &row).await? {
            inserted += 1;
            report.logs.push(format!("Inserted: {title}"));
        } else {
            report.skipped += 1;
            report
                .logs
                .push(format!("Skipped (duplicate): tmdb_id {tmdb_id}"));
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Insert the auxiliary rows for one record and assemble the catalog row
/// referencing their generated ids.
async fn resolve_record(
    tx: &mut Transaction<'_, Postgres>,
    record: &ImportRecord,
    tmdb_id: i64,
    title: &str,
    options: &ImportOptions,
) -> Result<NewMovie, sqlx::Error> {
    // The poster row is created even for a null URL unless the policy says
    // otherwise; backdrop and source rows require a URL.
    let poster_img_id = match (&record.poster_url, options.missing_poster) {
        (None, MissingPosterPolicy::Skip) => None,
        (url, _) => Some(ImageRepo::create(tx, false, url.as_deref()).await?),
    };

    let backdrop_img_id = match &record.backdrop_url {
        Some(url) => Some(ImageRepo::create(tx, false, Some(url)).await?),
        None => None,
    };

    let src_id = match &record.source_url {
        Some(url) => Some(SourceLinkRepo::create(tx, url).await?),
        None => None,
    };

    Ok(NewMovie {
        tmdb_id,
        title: title.to_string(),
        overview: record.overview.clone(),
        genres: record.genres.clone(),
        rating: record.scaled_rating(),
        release_date: record.release_date(options.missing_year),
        poster_img_id,
        backdrop_img_id,
        src_id,
    })
}
