//! Codec Module
//!
//! The engine never decodes or encodes pixels itself. It asks an
//! [`ImageCodec`] for the original dimensions at insert time and for a
//! resized re-encoding when a derived resolution is first requested.

mod image_codec;

pub use image_codec::ImageCrateCodec;

use crate::error::Result;

/// Image decode/resize capability used by insert and lazy resize
pub trait ImageCodec {
    /// (width, height) of an encoded image
    fn decode_dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)>;

    /// Decode, scale both sides uniformly by `scale`, and re-encode
    fn resize_and_encode(&self, bytes: &[u8], scale: f64) -> Result<Vec<u8>>;
}

impl<T: ImageCodec + ?Sized> ImageCodec for &T {
    fn decode_dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        (**self).decode_dimensions(bytes)
    }

    fn resize_and_encode(&self, bytes: &[u8], scale: f64) -> Result<Vec<u8>> {
        (**self).resize_and_encode(bytes, scale)
    }
}

impl<T: ImageCodec + ?Sized> ImageCodec for Box<T> {
    fn decode_dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        (**self).decode_dimensions(bytes)
    }

    fn resize_and_encode(&self, bytes: &[u8], scale: f64) -> Result<Vec<u8>> {
        (**self).resize_and_encode(bytes, scale)
    }
}

/// Uniform scale that fits `width x height` into the target box
///
/// The tighter-fitting dimension wins so the result never exceeds the box
/// on either side.
pub fn resize_ratio(width: u32, height: u32, max_width: u16, max_height: u16) -> f64 {
    let h_shrink = f64::from(max_width) / f64::from(width);
    let v_shrink = f64::from(max_height) / f64::from(height);
    h_shrink.min(v_shrink)
}
