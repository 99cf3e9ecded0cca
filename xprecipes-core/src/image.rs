//! Image gate for recipe uploads.
//!
//! An upload is accepted only if its filename carries an allowed extension,
//! it is no larger than [`MAX_FILE_SIZE`], and its bytes decode as an image.
//! Accepted uploads get a fresh storage key; storing them is the caller's job.

use std::io::Cursor;

use image::ImageReader;
use uuid::Uuid;

use crate::error::ImageError;

/// Extensions (without the dot) an uploaded filename may end with.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Maximum accepted image size (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Stored as a recipe's image key when no image was uploaded.
pub const DEFAULT_IMAGE_KEY: &str = "default_image_key";

/// An uploaded file as received from the client.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub content_length: u64,
    pub data: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_length: data.len() as u64,
            data,
        }
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Result of passing the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedImage {
    /// Object-store key, `<uuid>.<extension>`.
    pub key: String,
    /// MIME type of the decoded format (e.g. "image/png").
    pub content_type: &'static str,
}

/// Run an upload through the gate. Checks happen in order: extension, size, decode.
pub fn accept_image(upload: &ImageUpload) -> Result<AcceptedImage, ImageError> {
    let extension = allowed_extension(&upload.filename).ok_or(ImageError::InvalidFileType)?;

    if upload.content_length > MAX_FILE_SIZE {
        return Err(ImageError::FileTooLarge);
    }

    let content_type = decode(&upload.data)?;

    Ok(AcceptedImage {
        key: storage_key(extension),
        content_type,
    })
}

/// The allowed extension `filename` ends with, if any. Matching is case-sensitive.
fn allowed_extension(filename: &str) -> Option<&'static str> {
    ALLOWED_EXTENSIONS.iter().copied().find(|extension| {
        filename
            .strip_suffix(extension)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Decode the full image to make sure it is not truncated or garbage.
fn decode(data: &[u8]) -> Result<&'static str, ImageError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|_| ImageError::CorruptImage)?;

    let format = reader.format().ok_or(ImageError::CorruptImage)?;

    reader.decode().map_err(|_| ImageError::CorruptImage)?;

    Ok(format.to_mime_type())
}

fn storage_key(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}
