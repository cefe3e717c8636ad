//! Error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while rendering or saving an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The render root (or icon markup) is not valid SVG.
    #[error("SVG parsing failed: {0}")]
    Parse(String),

    /// A pixmap of the requested size could not be allocated.
    #[error("Failed to create {0}x{0} pixmap")]
    Pixmap(u32),

    /// PNG or JPEG encoding failed.
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing the output file failed.
    #[error("Failed to save export: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking encode task panicked or was cancelled.
    #[error("Export task failed: {0}")]
    Task(String),
}

/// Errors that can occur while reading a style profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile is not valid JSON or does not match the schema.
    #[error("Invalid profile: {0}")]
    Json(#[from] serde_json::Error),

    /// The profile was written by a newer format version.
    #[error("Unsupported profile version {0} (max supported: {max})", max = crate::profile::PROFILE_VERSION)]
    UnsupportedVersion(u32),
}
