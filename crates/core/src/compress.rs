//! Image re-encoding: output formats, quality levels, and the re-encode
//! operation itself.
//!
//! Codec work is delegated to the `image` crate; this module fixes the
//! supported output formats, the named quality levels, and the
//! fit-inside/never-enlarge resize behavior. [`recompress`] is CPU-bound;
//! callers run it on a blocking thread.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Output Format
// ---------------------------------------------------------------------------

/// Supported re-encode output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    #[default]
    Webp,
    Tiff,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Tiff => "tiff",
        }
    }

    /// Parse a lowercase format name. `jpg` is an alias for `jpeg`.
    /// Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// All valid format values.
    pub const ALL: &'static [&'static str] = &["jpeg", "png", "webp", "tiff"];

    /// MIME type used in the response data URI.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Tiff => "image/tiff",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Quality Level
// ---------------------------------------------------------------------------

/// Named quality levels exposed to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a quality level name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// All valid quality values.
    pub const ALL: &'static [&'static str] = &["low", "medium", "high"];

    /// JPEG encoder quality (0-100 scale).
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            Self::Low => 50,
            Self::Medium => 75,
            Self::High => 90,
        }
    }

    /// PNG compression profile. Higher visual quality maps to lighter
    /// compression, mirroring the JPEG quality scale.
    pub fn png_compression(&self) -> CompressionType {
        match self {
            Self::Low => CompressionType::Best,
            Self::Medium => CompressionType::Default,
            Self::High => CompressionType::Fast,
        }
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Re-encode
// ---------------------------------------------------------------------------

/// Parameters for one re-encode operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressOptions {
    pub format: OutputFormat,
    pub quality: QualityLevel,
    /// Maximum output width; `None` (or zero) leaves the axis unconstrained.
    pub max_width: Option<u32>,
    /// Maximum output height; `None` (or zero) leaves the axis unconstrained.
    pub max_height: Option<u32>,
}

/// A re-encoded image plus its final dimensions.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

/// Re-encode `input` according to `options`.
///
/// Decoding failures are validation errors (the caller sent bytes that are
/// not a recognizable image); encoding failures are internal errors.
pub fn recompress(input: &[u8], options: &CompressOptions) -> Result<CompressedImage, CoreError> {
    let img = image::load_from_memory(input)
        .map_err(|e| CoreError::Validation(format!("Unrecognized image data: {e}")))?;

    let img = fit_within(img, options.max_width, options.max_height);
    let (width, height) = img.dimensions();

    let mut bytes = Vec::new();
    match options.format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut bytes, options.quality.jpeg_quality());
            rgb.write_with_encoder(encoder).map_err(encode_error)?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut bytes,
                options.quality.png_compression(),
                PngFilter::Adaptive,
            );
            img.write_with_encoder(encoder).map_err(encode_error)?;
        }
        OutputFormat::Webp => {
            // The webp encoder is lossless-only and accepts RGB8/RGBA8 input.
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            let encoder = WebPEncoder::new_lossless(&mut bytes);
            rgba.write_with_encoder(encoder).map_err(encode_error)?;
        }
        OutputFormat::Tiff => {
            let mut cursor = std::io::Cursor::new(Vec::new());
            img.write_to(&mut cursor, ImageFormat::Tiff)
                .map_err(encode_error)?;
            bytes = cursor.into_inner();
        }
    }

    Ok(CompressedImage {
        bytes,
        width,
        height,
        format: options.format,
    })
}

fn encode_error(err: image::ImageError) -> CoreError {
    CoreError::Internal(format!("Image encode failed: {err}"))
}

/// Scale down to fit within the given bounds, preserving aspect ratio and
/// never enlarging. A missing or zero bound leaves that axis unconstrained.
fn fit_within(img: DynamicImage, max_width: Option<u32>, max_height: Option<u32>) -> DynamicImage {
    let (w, h) = img.dimensions();
    let bound_w = max_width.filter(|&v| v > 0).unwrap_or(w);
    let bound_h = max_height.filter(|&v| v > 0).unwrap_or(h);
    if w <= bound_w && h <= bound_h {
        return img;
    }
    img.resize(bound_w, bound_h, FilterType::Lanczos3)
}

// ---------------------------------------------------------------------------
// Payload helpers
// ---------------------------------------------------------------------------

/// Strip a `data:<mime>;base64,` prefix if present, returning the raw
/// base64 portion. Anything else passes through unchanged.
pub fn strip_data_uri(input: &str) -> &str {
    if input.starts_with("data:") {
        if let Some((head, rest)) = input.split_once(',') {
            if head.ends_with(";base64") {
                return rest;
            }
        }
    }
    input
}

/// Percentage size reduction formatted like `"37.50%"`.
///
/// Negative when the output is larger than the input; `"0.00%"` when the
/// input was empty.
pub fn compression_rate(original_size: usize, compressed_size: usize) -> String {
    if original_size == 0 {
        return "0.00%".to_string();
    }
    let rate = (1.0 - compressed_size as f64 / original_size as f64) * 100.0;
    format!("{rate:.2}%")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Encode a small gradient image as PNG bytes.
    fn png_fixture(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }));
        let mut cursor = std::io::Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    // -- OutputFormat tests -----------------------------------------------

    #[test]
    fn format_round_trip() {
        for s in OutputFormat::ALL {
            let f = OutputFormat::from_str(s).unwrap();
            assert_eq!(f.as_str(), *s);
        }
    }

    #[test]
    fn jpg_is_an_alias_for_jpeg() {
        assert_eq!(OutputFormat::from_str("jpg"), Some(OutputFormat::Jpeg));
    }

    #[test]
    fn unknown_format_returns_none() {
        assert!(OutputFormat::from_str("avif").is_none());
        assert!(OutputFormat::from_str("gif").is_none());
    }

    #[test]
    fn default_format_is_webp() {
        assert_eq!(OutputFormat::default(), OutputFormat::Webp);
    }

    // -- QualityLevel tests -------------------------------------------------

    #[test]
    fn quality_round_trip() {
        for s in QualityLevel::ALL {
            let q = QualityLevel::from_str(s).unwrap();
            assert_eq!(q.as_str(), *s);
        }
    }

    #[test]
    fn quality_maps_to_jpeg_scale() {
        assert_eq!(QualityLevel::Low.jpeg_quality(), 50);
        assert_eq!(QualityLevel::Medium.jpeg_quality(), 75);
        assert_eq!(QualityLevel::High.jpeg_quality(), 90);
    }

    #[test]
    fn default_quality_is_medium() {
        assert_eq!(QualityLevel::default(), QualityLevel::Medium);
    }

    // -- recompress tests -------------------------------------------------------

    #[test]
    fn recompress_to_jpeg_with_bounds() {
        let input = png_fixture(100, 80);
        let out = recompress(
            &input,
            &CompressOptions {
                format: OutputFormat::Jpeg,
                quality: QualityLevel::Medium,
                max_width: Some(50),
                max_height: None,
            },
        )
        .unwrap();

        assert_eq!(out.format, OutputFormat::Jpeg);
        assert_eq!((out.width, out.height), (50, 40));
        assert!(!out.bytes.is_empty());
        // The output must itself be a decodable JPEG.
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (50, 40));
    }

    #[test]
    fn recompress_never_enlarges() {
        let input = png_fixture(40, 30);
        let out = recompress(
            &input,
            &CompressOptions {
                format: OutputFormat::Png,
                max_width: Some(1000),
                max_height: Some(1000),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!((out.width, out.height), (40, 30));
    }

    #[test]
    fn recompress_without_bounds_keeps_dimensions() {
        let input = png_fixture(64, 48);
        let out = recompress(&input, &CompressOptions::default()).unwrap();
        assert_eq!((out.width, out.height), (64, 48));
        assert_eq!(out.format, OutputFormat::Webp);
    }

    #[test]
    fn recompress_rejects_garbage() {
        let err = recompress(b"not an image", &CompressOptions::default()).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn zero_bound_is_unconstrained() {
        let input = png_fixture(30, 20);
        let out = recompress(
            &input,
            &CompressOptions {
                format: OutputFormat::Png,
                max_width: Some(0),
                max_height: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!((out.width, out.height), (30, 20));
    }

    // -- payload helper tests ------------------------------------------------------

    #[test]
    fn strips_data_uri_prefix() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
    }

    #[test]
    fn bare_base64_passes_through() {
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
    }

    #[test]
    fn non_base64_data_uri_passes_through() {
        assert_eq!(strip_data_uri("data:text/plain,hello"), "data:text/plain,hello");
    }

    #[test]
    fn compression_rate_formats_two_decimals() {
        assert_eq!(compression_rate(1000, 250), "75.00%");
        assert_eq!(compression_rate(0, 10), "0.00%");
        assert_eq!(compression_rate(100, 150), "-50.00%");
    }
}
