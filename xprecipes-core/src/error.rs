use thiserror::Error;

/// Reasons an uploaded recipe image is refused.
///
/// The display strings are returned to API clients verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid file type")]
    InvalidFileType,

    #[error("File size exceeds 5MB")]
    FileTooLarge,

    #[error("Image is corrupt")]
    CorruptImage,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unallowed value {0}")]
pub struct UnknownUnit(pub String);
