//! Speaker image uploads
//!
//! Uploads arrive base64-encoded with a declared content type. Accepted images
//! are shrunk to fit the configured square and re-encoded as PNG.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use codecamp_common::config::UploadConfig;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Image payload of a speaker edit request
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub content_type: String,
    /// Base64 (standard alphabet) file contents
    pub data: String,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("File size limit is {} KB", .max_bytes / 1000)]
    TooLarge { max_bytes: usize },

    #[error("Image data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Uploaded file is not an image")]
    NotAnImage,

    #[error("Image could not be decoded: {0}")]
    Decode(image::ImageError),

    #[error("Image could not be encoded: {0}")]
    Encode(image::ImageError),
}

/// Validate and normalize an upload
///
/// Returns `Ok(None)` when the declared content type is not `image/*`; such
/// uploads are skipped and the rest of the edit proceeds.
pub fn process_upload(
    upload: &ImageUpload,
    config: &UploadConfig,
) -> Result<Option<Vec<u8>>, ImageError> {
    if !upload.content_type.to_ascii_lowercase().starts_with("image/") {
        warn!(
            "Ignoring upload with content type {:?} (not an image)",
            upload.content_type
        );
        return Ok(None);
    }

    let bytes = general_purpose::STANDARD.decode(upload.data.trim())?;
    if bytes.len() > config.max_image_size_bytes {
        return Err(ImageError::TooLarge {
            max_bytes: config.max_image_size_bytes,
        });
    }

    if !infer::is_image(&bytes) {
        return Err(ImageError::NotAnImage);
    }

    let image = image::load_from_memory(&bytes).map_err(ImageError::Decode)?;
    let png = to_png(&fit_within(image, config.image_bounding_box))?;

    debug!(
        "Processed {} upload: {} bytes in, {} bytes PNG out",
        upload.content_type,
        bytes.len(),
        png.len()
    );
    Ok(Some(png))
}

/// Shrink so neither side exceeds `bounding_box`, keeping the aspect ratio
///
/// Images already inside the box are returned unchanged.
pub fn fit_within(image: DynamicImage, bounding_box: u32) -> DynamicImage {
    if image.width() <= bounding_box && image.height() <= bounding_box {
        return image;
    }
    image.resize(bounding_box, bounding_box, FilterType::Lanczos3)
}

fn to_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(ImageError::Encode)?;
    Ok(buffer.into_inner())
}
