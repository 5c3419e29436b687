//! Default codec backed by the `image` crate

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::{PictDbError, Result};

use super::ImageCodec;

/// JPEG quality used when re-encoding derived resolutions
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Decodes any enabled format, writes PNG back as PNG and the rest as JPEG
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateCodec {
    jpeg_quality: u8,
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageCrateCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the JPEG quality (clamped to 1..=100)
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

impl ImageCodec for ImageCrateCodec {
    /// Reads the image header only; pixels are not decoded
    fn decode_dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }

    fn resize_and_encode(&self, bytes: &[u8], scale: f64) -> Result<Vec<u8>> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PictDbError::Codec(format!("invalid scale factor {}", scale)));
        }

        let format = image::guess_format(bytes)?;
        let img = image::load_from_memory_with_format(bytes, format)?;
        let (width, height) = img.dimensions();
        let resized = img.resize_exact(
            scaled(width, scale),
            scaled(height, scale),
            FilterType::Triangle,
        );

        let mut out = Vec::new();
        match format {
            ImageFormat::Png => {
                resized.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
            }
            _ => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
                let encoder = JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
                rgb.write_with_encoder(encoder)?;
            }
        }
        Ok(out)
    }
}

fn scaled(dim: u32, scale: f64) -> u32 {
    ((f64::from(dim) * scale).round() as u32).max(1)
}
