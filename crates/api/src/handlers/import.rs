//! Handlers for the bulk movie import endpoint.
//!
//! One route carries three behaviours: POST runs the import (JSON body or
//! a multipart file holding the same JSON), GET with `?ping` probes
//! database connectivity, and every other method is answered with 405.
//! Bulk-import clients depend on the exact response field names used here,
//! so these handlers build their own payloads instead of going through
//! [`crate::error::AppError`].

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cinevault_core::record::ImportRecord;
use cinevault_db::import::run_import;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Query parameters for GET requests on the import route.
#[derive(Debug, Deserialize)]
pub struct ProbeParams {
    /// Presence (`?ping`) selects the connectivity probe.
    pub ping: Option<String>,
}

/// Query parameters for the import POST.
#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// `format=text` returns the trace log as plain text instead of JSON.
    pub format: Option<String>,
}

/// Successful import summary.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// False when at least one chunk rolled back.
    pub success: bool,
    pub inserted: u32,
    pub skipped: u32,
    /// Ordered trace of the run.
    pub logs: Vec<String>,
}

/// Import failure payload.
#[derive(Debug, Serialize)]
pub struct ImportErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}

/// Connectivity probe payload. Always served with status 200; failure is
/// reported in the body, never as an HTTP error.
#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub db_connect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/import/movies
///
/// Accept a `{ "movies": [...] }` batch as a JSON body or as a multipart
/// file field, run the chunked import, and return the summary. Validation
/// failures are answered in this order: unreadable payload, then missing
/// `movies` array.
pub async fn import_movies(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    request: Request,
) -> Response {
    let raw = match read_payload(request).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    let payload: Value = match serde_json::from_slice(&raw) {
        Ok(value) => value,
        Err(_) => return bad_request("Invalid JSON"),
    };

    let movies = match payload.get("movies").and_then(Value::as_array) {
        Some(list) => list,
        None => return bad_request("movies[] missing"),
    };

    let records: Vec<ImportRecord> = movies.iter().map(ImportRecord::from_value).collect();
    tracing::info!(records = records.len(), "import request accepted");

    match run_import(&state.pool, records, &state.config.import).await {
        Ok(report) => {
            if params.format.as_deref() == Some("text") {
                return report.logs.join("\n").into_response();
            }
            Json(ImportResponse {
                success: report.success(),
                inserted: report.inserted,
                skipped: report.skipped,
                logs: report.logs,
            })
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "import setup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ImportErrorResponse {
                    error: "DB_TRANSACTION_FAILED",
                    message: Some(err.to_string()),
                    logs: Some(Vec::new()),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/v1/import/movies
///
/// With `?ping`, probe database connectivity. Without it, the method is
/// wrong for this route.
pub async fn import_probe(
    State(state): State<AppState>,
    Query(params): Query<ProbeParams>,
) -> Response {
    if params.ping.is_none() {
        return method_not_allowed().await;
    }

    let probe = match cinevault_db::health_check(&state.pool).await {
        Ok(()) => ProbeResponse {
            db_connect: true,
            error: None,
        },
        Err(err) => ProbeResponse {
            db_connect: false,
            error: Some(err.to_string()),
        },
    };
    Json(probe).into_response()
}

/// Fallback for unsupported methods on the import route.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ImportErrorResponse {
            error: "POST only",
            message: None,
            logs: None,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Payload plumbing
// ---------------------------------------------------------------------------

/// Read the raw import payload from either a direct body or the first
/// non-empty multipart field.
async fn read_payload(request: Request) -> Result<Bytes, Response> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        return Bytes::from_request(request, &())
            .await
            .map_err(|_| bad_request("Invalid JSON"));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|_| bad_request("Invalid JSON"))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| bad_request("Invalid JSON"))?
    {
        let data = field.bytes().await.map_err(|_| bad_request("Invalid JSON"))?;
        if !data.is_empty() {
            return Ok(data);
        }
    }

    Err(bad_request("Invalid JSON"))
}

fn bad_request(error: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ImportErrorResponse {
            error,
            message: None,
            logs: None,
        }),
    )
        .into_response()
}
