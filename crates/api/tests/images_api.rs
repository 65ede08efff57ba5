//! HTTP-level integration tests for the image compression endpoint and the
//! upload proxy's local failure paths.
//!
//! The upload proxy's happy path needs the real image host and is not
//! exercised here; the tests cover everything the server decides on its own
//! (configuration gating and payload validation).

mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use common::{body_json, build_test_app, post_json, test_config};
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde_json::json;
use sqlx::PgPool;

const COMPRESS_URI: &str = "/api/v1/images/compress";
const UPLOAD_URI: &str = "/api/v1/images/upload";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Base64-encoded PNG gradient of the given dimensions.
fn png_base64(w: u32, h: u32) -> String {
    let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(w, h, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }));
    let mut cursor = std::io::Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png).unwrap();
    BASE64.encode(cursor.into_inner())
}

// ---------------------------------------------------------------------------
// Test: compress re-encodes to the requested format and bounds
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_compress_png_to_bounded_jpeg(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        COMPRESS_URI,
        json!({
            "image_data": format!("data:image/png;base64,{}", png_base64(100, 80)),
            "format": "jpeg",
            "quality": "high",
            "width": 50
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["format"], "jpeg");
    assert_eq!(data["width"], 50);
    assert_eq!(data["height"], 40, "aspect ratio must be preserved");
    assert!(data["original_size"].as_u64().unwrap() > 0);
    assert!(data["compressed_size"].as_u64().unwrap() > 0);
    assert!(
        data["compression_rate"].as_str().unwrap().ends_with('%'),
        "rate should be a percentage string"
    );

    // The returned data URI must decode back to a real JPEG of the
    // advertised dimensions.
    let image_data = data["image_data"].as_str().unwrap();
    let b64 = image_data
        .strip_prefix("data:image/jpeg;base64,")
        .expect("data URI should carry the jpeg MIME type");
    let decoded = image::load_from_memory(&BASE64.decode(b64).unwrap()).unwrap();
    assert_eq!(decoded.dimensions(), (50, 40));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_compress_defaults_to_webp(pool: PgPool) {
    // Bare base64 without a data URI prefix is accepted too.
    let response = post_json(
        build_test_app(pool),
        COMPRESS_URI,
        json!({ "image_data": png_base64(16, 16) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["format"], "webp");
    assert_eq!(body["data"]["width"], 16);
    assert_eq!(body["data"]["height"], 16);
}

// ---------------------------------------------------------------------------
// Test: compress input validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_compress_unsupported_format_returns_400(pool: PgPool) {
    for format in ["avif", "gif", "bmp"] {
        let response = post_json(
            build_test_app(pool.clone()),
            COMPRESS_URI,
            json!({ "image_data": png_base64(8, 8), "format": format }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        let message = body["error"].as_str().unwrap();
        assert!(
            message.contains("jpeg") && message.contains("webp"),
            "error should list the supported formats, got: {message}"
        );
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_compress_invalid_base64_returns_400(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        COMPRESS_URI,
        json!({ "image_data": "!!! not base64 !!!" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_compress_undecodable_image_returns_400(pool: PgPool) {
    // Valid base64, but the bytes are not an image.
    let response = post_json(
        build_test_app(pool),
        COMPRESS_URI,
        json!({ "image_data": BASE64.encode(b"plain text, no pixels") }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: upload proxy local failure paths
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_upload_without_api_key_returns_503(pool: PgPool) {
    // test_config leaves the image host unconfigured.
    let response = post_json(
        build_test_app(pool),
        UPLOAD_URI,
        json!({ "image_data": png_base64(8, 8) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAVAILABLE");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_upload_empty_payload_returns_400(pool: PgPool) {
    // With a key configured, an empty payload is rejected before any
    // upstream request is made.
    let mut config = test_config();
    config.image_host.api_key = Some("test-key".to_string());
    let app = common::build_test_app_with_config(pool, config);

    let response = post_json(app, UPLOAD_URI, json!({ "image_data": "   " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}
