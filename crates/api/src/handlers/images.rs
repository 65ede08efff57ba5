//! Handlers for image re-encoding and the external upload proxy.

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cinevault_core::compress::{
    compression_rate, recompress, strip_data_uri, CompressOptions, OutputFormat, QualityLevel,
};

use crate::error::{AppError, AppResult};
use crate::response::SuccessResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Compress
// ---------------------------------------------------------------------------

/// Request body for the compression endpoint.
///
/// `image_data` is base64, with or without a `data:` URI prefix.
#[derive(Debug, Deserialize)]
pub struct CompressRequest {
    pub image_data: String,
    /// Output format name (default `webp`).
    pub format: Option<String>,
    /// Quality level name; unknown names fall back to `medium`.
    pub quality: Option<String>,
    /// Maximum output width in pixels.
    pub width: Option<u32>,
    /// Maximum output height in pixels.
    pub height: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CompressResult {
    /// Re-encoded image as a `data:` URI.
    pub image_data: String,
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
    pub original_size: usize,
    pub compressed_size: usize,
    /// Size reduction like `"37.50%"`; negative when the output grew.
    pub compression_rate: String,
}

/// POST /api/v1/images/compress
///
/// Decode a base64 image, re-encode it in the requested format and quality,
/// optionally scaling down to fit the given bounds, and return it as a
/// `data:` URI.
pub async fn compress_image(
    Json(req): Json<CompressRequest>,
) -> AppResult<Json<SuccessResponse<CompressResult>>> {
    let format = match req.format.as_deref() {
        Some(name) => OutputFormat::from_str(name).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported format '{name}' (expected one of {:?})",
                OutputFormat::ALL
            ))
        })?,
        None => OutputFormat::default(),
    };

    // Unknown quality names fall back to the default rather than erroring.
    let quality = req
        .quality
        .as_deref()
        .and_then(QualityLevel::from_str)
        .unwrap_or_default();

    let raw = BASE64
        .decode(strip_data_uri(req.image_data.trim()))
        .map_err(|_| AppError::BadRequest("Image payload is not valid base64".to_string()))?;
    let original_size = raw.len();

    let options = CompressOptions {
        format,
        quality,
        max_width: req.width,
        max_height: req.height,
    };

    // Re-encoding is CPU-bound; keep it off the async workers.
    let compressed = tokio::task::spawn_blocking(move || recompress(&raw, &options))
        .await
        .map_err(|e| AppError::InternalError(format!("Compression task failed: {e}")))??;

    let compressed_size = compressed.bytes.len();
    tracing::debug!(
        format = %compressed.format,
        original_size,
        compressed_size,
        "image re-encoded"
    );

    Ok(Json(SuccessResponse::new(CompressResult {
        image_data: format!(
            "data:{};base64,{}",
            compressed.format.mime(),
            BASE64.encode(&compressed.bytes)
        ),
        format: compressed.format.as_str(),
        width: compressed.width,
        height: compressed.height,
        original_size,
        compressed_size,
        compression_rate: compression_rate(original_size, compressed_size),
    })))
}

// ---------------------------------------------------------------------------
// Upload proxy
// ---------------------------------------------------------------------------

/// Request body for the upload proxy endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Base64 image (with or without a `data:` URI prefix) or a plain URL;
    /// the image host accepts both as its `source`.
    pub image_data: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResult {
    /// Direct URL of the hosted image.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Hosted image size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// POST /api/v1/images/upload
///
/// Forward a base64 image to the configured image host and return the
/// hosted URLs. The API key never leaves the server; clients only ever see
/// this proxy.
pub async fn upload_image(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> AppResult<Json<SuccessResponse<UploadResult>>> {
    let host = &state.config.image_host;
    let api_key = host.api_key.as_deref().ok_or_else(|| {
        AppError::Unavailable("Image host API key is not configured".to_string())
    })?;

    let source = req.image_data.trim().to_string();
    if source.is_empty() {
        return Err(AppError::BadRequest("Image payload is empty".to_string()));
    }

    let form = reqwest::multipart::Form::new()
        .text("key", api_key.to_string())
        .text("action", "upload")
        .text("format", "json")
        .text("source", source);

    let response = state
        .http
        .post(&host.upload_url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| AppError::BadGateway(format!("Image host request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::BadGateway(format!(
            "Image host returned status {status}"
        )));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| AppError::BadGateway(format!("Image host returned invalid JSON: {e}")))?;

    let image = match body.get("image") {
        Some(value) if value.is_object() => value,
        _ => {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("no image in response");
            return Err(AppError::BadGateway(format!(
                "Image host rejected the upload: {message}"
            )));
        }
    };

    let url = image
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadGateway("Image host response has no image URL".to_string()))?
        .to_string();

    tracing::info!(%url, "image uploaded to external host");

    Ok(Json(SuccessResponse::new(UploadResult {
        url,
        thumb_url: image
            .pointer("/thumb/url")
            .and_then(Value::as_str)
            .map(str::to_string),
        viewer_url: image
            .get("url_viewer")
            .and_then(Value::as_str)
            .map(str::to_string),
        image_id: image
            .get("id_encoded")
            .and_then(Value::as_str)
            .map(str::to_string),
        size: image.get("size").and_then(Value::as_u64),
    })))
}
