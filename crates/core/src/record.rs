//! Import record extraction, validation, and batch policies.
//!
//! Incoming batches are untrusted JSON. One malformed record must never
//! fail the whole request, so extraction is lenient: every field is
//! coerced individually and anything unusable becomes null/default. Row
//! validation is a skip decision, never an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sanitize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of records per transactional chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Default pause between consecutive chunks, in milliseconds.
pub const DEFAULT_CHUNK_PAUSE_MS: u64 = 200;

// ---------------------------------------------------------------------------
// Import Record
// ---------------------------------------------------------------------------

/// One movie record extracted from an element of the `movies` array.
///
/// URL-ish fields are already bracket-stripped (see [`sanitize::clean`]).
/// The backdrop and source URLs are present only when the raw payload
/// carried a non-empty string at `backdrop.header` / `iframes[0].src`;
/// the poster URL has no such presence gate because a poster image row is
/// created even for a null URL (see [`MissingPosterPolicy`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    pub tmdb_id: Option<i64>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    /// Raw caller rating on its source scale; see [`ImportRecord::scaled_rating`].
    pub rating: f64,
    pub release_year: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub source_url: Option<String>,
}

impl ImportRecord {
    /// Extract a record from one raw batch element.
    ///
    /// Never fails: a non-object element yields a record with every field
    /// empty, which row validation then skips.
    pub fn from_value(value: &Value) -> Self {
        let backdrop_url = value
            .get("backdrop")
            .and_then(|b| b.get("header"))
            .filter(|h| matches!(h, Value::String(s) if !s.is_empty()))
            .and_then(sanitize::clean);

        let source_url = value
            .get("iframes")
            .and_then(|list| list.get(0))
            .and_then(|frame| frame.get("src"))
            .filter(|s| matches!(s, Value::String(v) if !v.is_empty()))
            .and_then(sanitize::clean);

        Self {
            tmdb_id: value.get("tmdb_id").and_then(lenient_i64),
            title: value
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string),
            overview: value
                .get("description")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            genres: value.get("genres").map(lenient_strings).unwrap_or_default(),
            rating: value.get("rating").and_then(lenient_f64).unwrap_or(0.0),
            release_year: value
                .get("year")
                .and_then(lenient_i64)
                .and_then(|y| i32::try_from(y).ok())
                .filter(|&y| y != 0),
            poster_url: value.get("poster").and_then(sanitize::clean),
            backdrop_url,
            source_url,
        }
    }

    /// Rating as stored: scaled x10 and rounded to an integer.
    pub fn scaled_rating(&self) -> i32 {
        (self.rating * 10.0).round() as i32
    }

    /// Release date as stored: January 1st of the release year, or the
    /// policy fallback when the year is missing or out of range.
    pub fn release_date(&self, policy: MissingYearPolicy) -> Option<NaiveDate> {
        self.release_year
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .or_else(|| policy.fallback_date())
    }

    /// Check the required identity fields, returning them on success.
    ///
    /// The external identifier must be present and positive; the title must
    /// be present and non-empty. A failure here is a row-level skip, never
    /// a request error.
    pub fn validate(&self) -> Result<(i64, &str), String> {
        let tmdb_id = match self.tmdb_id {
            Some(id) if id > 0 => id,
            _ => return Err("missing tmdb_id".to_string()),
        };
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => Ok((tmdb_id, t)),
            _ => Err("missing title".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field coercion
// ---------------------------------------------------------------------------

fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What to do when a record has no poster URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPosterPolicy {
    /// Insert the poster image row anyway, with a null URL.
    #[default]
    InsertNullRow,
    /// Create no poster row; the catalog row's poster reference stays null.
    Skip,
}

impl MissingPosterPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsertNullRow => "insert_null_row",
            Self::Skip => "skip",
        }
    }

    /// Parse a policy name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "insert_null_row" => Some(Self::InsertNullRow),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }

    /// All valid policy values.
    pub const ALL: &'static [&'static str] = &["insert_null_row", "skip"];
}

impl std::fmt::Display for MissingPosterPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to store as the release date when a record has no usable year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingYearPolicy {
    /// Store a null release date.
    #[default]
    Null,
    /// Store the 1970-01-01 sentinel.
    Epoch,
}

impl MissingYearPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Epoch => "epoch",
        }
    }

    /// Parse a policy name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "null" => Some(Self::Null),
            "epoch" => Some(Self::Epoch),
            _ => None,
        }
    }

    /// All valid policy values.
    pub const ALL: &'static [&'static str] = &["null", "epoch"];

    /// Date stored when the year is missing.
    pub fn fallback_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Null => None,
            Self::Epoch => NaiveDate::from_ymd_opt(1970, 1, 1),
        }
    }
}

impl std::fmt::Display for MissingYearPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Import Options
// ---------------------------------------------------------------------------

/// Tunables for the batch coordinator.
///
/// Deployment configuration, not caller input: the server builds these once
/// from the environment and reuses them for every request.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Records per transactional chunk.
    pub chunk_size: usize,
    /// Pause between consecutive chunks. Zero disables pacing.
    pub chunk_pause_ms: u64,
    /// Optional hard cap on accepted records; longer lists are truncated.
    pub max_records: Option<usize>,
    pub missing_poster: MissingPosterPolicy,
    pub missing_year: MissingYearPolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_pause_ms: DEFAULT_CHUNK_PAUSE_MS,
            max_records: None,
            missing_poster: MissingPosterPolicy::default(),
            missing_year: MissingYearPolicy::default(),
        }
    }
}

/// Number of chunks a batch of `len` records yields at `chunk_size`.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    if len == 0 {
        0
    } else {
        len.div_ceil(chunk_size.max(1))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
