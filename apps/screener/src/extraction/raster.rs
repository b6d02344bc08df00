use std::io::Cursor;

use bytes::Bytes;
use image::ImageFormat;

use super::ExtractionError;

/// Decodes any supported raster format and re-encodes it as PNG, the one
/// format every vision endpoint accepts inline.
pub async fn normalize_to_png(content: Bytes) -> Result<Vec<u8>, ExtractionError> {
    tokio::task::spawn_blocking(move || reencode(&content))
        .await
        .map_err(|e| ExtractionError::Image(e.to_string()))?
}

fn reencode(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ExtractionError::Image(e.to_string()))?;

    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ExtractionError::Image(e.to_string()))?;
    Ok(out.into_inner())
}
