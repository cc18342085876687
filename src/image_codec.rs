//! Image codec adapter (component C2): the single varying dependency between
//! this crate's core and an actual JPEG decoder/encoder/scaler. Abstracted
//! behind a small capability trait per Design Notes §9, backed by the
//! `image` crate.

use crate::error::{PictDbError, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, imageops::FilterType};
use std::io::Cursor;

/// A decoded image kept in memory between decode and encode/scale calls.
pub struct DecodedImage(pub DynamicImage);

impl DecodedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
}

pub trait ImageCodec {
    fn decode_jpeg(&self, bytes: &[u8]) -> Result<DecodedImage>;
    fn intrinsic_size(&self, bytes: &[u8]) -> Result<(u32, u32)>;
    fn encode_jpeg(&self, image: &DecodedImage) -> Result<Vec<u8>>;
    fn scale_to_fit(&self, image: &DecodedImage, target_w: u32, target_h: u32) -> DecodedImage;
}

/// Default adapter backed by the pure-Rust `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRsCodec;

impl ImageCodec for ImageRsCodec {
    fn decode_jpeg(&self, bytes: &[u8]) -> Result<DecodedImage> {
        image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
            .map(DecodedImage)
            .map_err(|e| PictDbError::Codec(e.to_string()))
    }

    fn intrinsic_size(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        Ok(self.decode_jpeg(bytes)?.dimensions())
    }

    fn encode_jpeg(&self, image: &DecodedImage) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        image
            .0
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .map_err(|e| PictDbError::Codec(e.to_string()))?;
        Ok(out)
    }

    /// Scale to the ratio `min(target_w/w, target_h/h)`, as §4.4 specifies, clamped so a
    /// request for a target at least as large as the original never upscales.
    fn scale_to_fit(&self, image: &DecodedImage, target_w: u32, target_h: u32) -> DecodedImage {
        let (w, h) = image.dimensions();
        let ratio = resize_ratio(w, h, target_w, target_h).min(1.0);
        let new_w = ((w as f64) * ratio).round().max(1.0) as u32;
        let new_h = ((h as f64) * ratio).round().max(1.0) as u32;
        DecodedImage(image.0.resize_exact(new_w, new_h, FilterType::Triangle))
    }
}

fn resize_ratio(w: u32, h: u32, target_w: u32, target_h: u32) -> f64 {
    let h_shrink = target_w as f64 / w as f64;
    let v_shrink = target_h as f64 / h as f64;
    h_shrink.min(v_shrink)
}
