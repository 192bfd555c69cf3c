//! Raster image decoding for OCR uploads

use image::ImageFormat;
use std::io::Cursor;

use crate::error::{AppError, Result};

/// Decode an uploaded image of any supported format and re-encode it as PNG
pub fn decode_to_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let image = image::load_from_memory(bytes)?;

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// [`decode_to_png`] on the blocking thread pool
pub async fn decode_to_png_blocking(bytes: Vec<u8>) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || decode_to_png(&bytes))
        .await
        .map_err(|e| AppError::Internal(format!("Image decoding task failed: {}", e)))?
}
