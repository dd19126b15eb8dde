//! Encoding read-back pixels into an image file.

use crate::error::{EffectError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage, imageops};
use std::io::Cursor;

pub const PNG: &str = "image/png";
pub const JPEG: &str = "image/jpeg";
pub const WEBP: &str = "image/webp";

/// JPEG quality used when none (or an out-of-range one) is given.
const DEFAULT_JPEG_QUALITY: f64 = 0.92;

/// Encoded image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Encode bottom-up RGBA8 `pixels` as `mime_type`.
///
/// Unsupported types fall back to PNG. `quality` in `0.0..=1.0` applies to
/// JPEG only; WebP output is lossless.
pub fn encode(pixels: Vec<u8>, width: u32, height: u32, mime_type: &str, quality: Option<f64>) -> Result<Blob> {
    let mut image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        EffectError::Backend(format!("pixel buffer does not match {width}x{height}"))
    })?;
    imageops::flip_vertical_in_place(&mut image);

    let mut bytes = Vec::new();
    let mime_type = match mime_type {
        JPEG => {
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(quality)))?;
            JPEG
        }
        WEBP => {
            image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::WebP)?;
            WEBP
        }
        _ => {
            image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
            PNG
        }
    };

    Ok(Blob { mime_type, bytes })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 1..=100
fn jpeg_quality(quality: Option<f64>) -> u8 {
    let quality = quality
        .filter(|q| (0.0..=1.0).contains(q))
        .unwrap_or(DEFAULT_JPEG_QUALITY);
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}
