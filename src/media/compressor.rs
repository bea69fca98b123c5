//! Image compressor for inline payloads.
//!
//! Shrinks an inline image so it can live in the quota-bound primary store: decode,
//! scale down to fit fixed bounds while keeping the aspect ratio, and re-encode as
//! JPEG at a reduced quality. Compression never fails outward; if anything goes wrong
//! the original payload is returned untouched.

use super::data_uri;
use crate::domain::error::{PortfolioError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

/// Default maximum output width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 500;

/// Default maximum output height in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 350;

/// Default JPEG quality (1-100).
pub const DEFAULT_QUALITY: u8 = 70;

/// Computes the largest size within `max_width` × `max_height` with the same aspect
/// ratio as `width` × `height`.
///
/// Images that already fit are returned unchanged; they are never upscaled.
///
/// ```
/// use portfolio_store::media::fit_within;
///
/// assert_eq!(fit_within(320, 200, 500, 350), (320, 200));
/// assert_eq!(fit_within(2000, 1000, 500, 350), (500, 250));
/// assert_eq!(fit_within(700, 1400, 500, 350), (175, 350));
/// ```
#[must_use]
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }

    let ratio = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = |side: u32, max: u32| ((f64::from(side) * ratio).round() as u32).clamp(1, max.max(1));

    (scaled(width, max_width), scaled(height, max_height))
}

/// Re-encodes inline image payloads into smaller JPEG payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCompressor {
    max_width: u32,
    max_height: u32,
    quality: u8,
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT, DEFAULT_QUALITY)
    }
}

impl ImageCompressor {
    /// Creates a compressor. `quality` is clamped to 1-100.
    #[must_use]
    pub fn new(max_width: u32, max_height: u32, quality: u8) -> Self {
        Self {
            max_width: max_width.max(1),
            max_height: max_height.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    #[must_use]
    pub const fn max_width(&self) -> u32 {
        self.max_width
    }

    #[must_use]
    pub const fn max_height(&self) -> u32 {
        self.max_height
    }

    #[must_use]
    pub const fn quality(&self) -> u8 {
        self.quality
    }

    /// Compresses an inline image payload.
    ///
    /// Values without an image `data:` prefix are returned unchanged, as is the original
    /// payload when decoding or encoding fails.
    #[must_use]
    pub fn compress(&self, payload: &str) -> String {
        if !data_uri::is_image_data_uri(payload) {
            return payload.to_string();
        }

        match self.try_compress(payload) {
            Ok(compressed) => {
                tracing::debug!(
                    original_len = payload.len(),
                    compressed_len = compressed.len(),
                    "image compressed"
                );
                compressed
            }
            Err(e) => {
                tracing::warn!(error = %e, "image compression failed, keeping original payload");
                payload.to_string()
            }
        }
    }

    /// Compresses an inline image payload, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::Image`] if the payload cannot be decoded as an image or
    /// the JPEG encoder fails.
    pub fn try_compress(&self, payload: &str) -> Result<String> {
        let bytes = data_uri::decode_image_bytes(payload)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| PortfolioError::Image(format!("failed to decode image: {e}")))?;

        let (width, height) = fit_within(
            decoded.width(),
            decoded.height(),
            self.max_width,
            self.max_height,
        );

        let resized = if (width, height) == (decoded.width(), decoded.height()) {
            decoded
        } else {
            decoded.resize_exact(width, height, FilterType::Triangle)
        };

        // JPEG has no alpha channel.
        let rgb = resized.to_rgb8();

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.quality)
            .encode_image(&rgb)
            .map_err(|e| PortfolioError::Image(format!("failed to encode JPEG: {e}")))?;

        Ok(data_uri::encode("image/jpeg", &encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_payload(width: u32, height: u32) -> String {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 200])
        });
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .expect("encode png");
        data_uri::encode("image/png", bytes.get_ref())
    }

    fn decoded_size(payload: &str) -> (u32, u32) {
        let bytes = data_uri::decode_image_bytes(payload).expect("decode payload");
        let img = image::load_from_memory(&bytes).expect("decode image");
        (img.width(), img.height())
    }

    #[test]
    fn fit_within_never_upscales() {
        assert_eq!(fit_within(10, 10, 500, 350), (10, 10));
        assert_eq!(fit_within(500, 350, 500, 350), (500, 350));
    }

    #[test]
    fn fit_within_keeps_aspect_ratio() {
        let (w, h) = fit_within(1920, 1080, 500, 350);
        assert_eq!(w, 500);
        assert_eq!(h, 281);
        let (w, h) = fit_within(1000, 2000, 500, 350);
        assert_eq!((w, h), (175, 350));
    }

    #[test]
    fn fit_within_never_collapses_to_zero() {
        assert_eq!(fit_within(10_000, 1, 500, 350), (500, 1));
    }

    #[test]
    fn compress_shrinks_large_images_to_jpeg() {
        let compressor = ImageCompressor::default();
        let payload = png_payload(1000, 700);

        let compressed = compressor.compress(&payload);

        assert!(compressed.starts_with("data:image/jpeg;base64,"));
        assert_eq!(decoded_size(&compressed), (500, 350));
    }

    #[test]
    fn compress_keeps_small_image_dimensions() {
        let compressor = ImageCompressor::default();
        let compressed = compressor.compress(&png_payload(64, 48));
        assert_eq!(decoded_size(&compressed), (64, 48));
    }

    #[test]
    fn compress_passes_through_non_images() {
        let compressor = ImageCompressor::default();
        assert_eq!(compressor.compress("https://example.com/a.png"), "https://example.com/a.png");
    }

    #[test]
    fn compress_returns_original_on_decode_failure() {
        let compressor = ImageCompressor::default();
        let garbage = data_uri::encode("image/png", b"definitely not a png");
        assert_eq!(compressor.compress(&garbage), garbage);
        assert!(compressor.try_compress(&garbage).is_err());
    }
}
