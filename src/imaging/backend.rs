//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the narrow codec contract the thumbnail
//! plugin depends on: read the native size of an image, and write a resized
//! copy. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The source could not be decoded as an image.
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// `Send + Sync` so a single backend can be shared by every capability
/// closure and used from rayon workers.
pub trait ImageBackend: Send + Sync {
    /// Whether files with this lowercase extension can be read and written.
    fn supports_extension(&self, extension: &str) -> bool;

    /// Get image dimensions. Fails when the file is not a decodable image.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize to exactly the requested size and write the output.
    ///
    /// Returns the dimensions of the image that was actually encoded.
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError>;
}
