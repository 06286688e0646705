//! Turning uploaded files into RGB rasters the estimator can measure.

use image::{ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::{FootError, Result};

/// Extensions accepted for uploads, compared case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// True if the name has a dot followed by an allowed extension
pub fn allowed_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => {
            let extension = extension.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&extension.as_str())
        }
        None => false,
    }
}

/// Decode an in-memory upload, guessing the format from its content
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| FootError::Decode {
            message: e.to_string(),
            source: None,
        })?;
    let img = reader.decode().map_err(FootError::decode)?;
    Ok(img.to_rgb8())
}

/// Check the extension, read and decode an image file
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !allowed_file(&file_name) {
        return Err(FootError::UnsupportedFormat { file_name });
    }

    let bytes = std::fs::read(path).map_err(|e| FootError::io(path, e))?;
    let img = decode_image(&bytes)?;
    tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), "image loaded");
    Ok(img)
}
