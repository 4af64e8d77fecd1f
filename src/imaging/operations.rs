//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{SizeRequest, calculate_thumb_dimensions};
use super::params::{Quality, ResizeParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &dyn ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for thumbnail generation.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailConfig {
    pub quality: Quality,
}

/// Plan a thumbnail operation without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_thumbnail(
    source: &Path,
    output_path: &Path,
    source_dims: (u32, u32),
    request: SizeRequest,
    config: &ThumbnailConfig,
) -> ResizeParams {
    let (width, height) = calculate_thumb_dimensions(source_dims, request);

    ResizeParams {
        source: source.to_path_buf(),
        output: output_path.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Create a thumbnail image at `output_path`.
///
/// `source_dims` comes from a prior [`get_dimensions`] call so callers can
/// tell an undecodable source apart from an encode failure. Returns the
/// dimensions the backend actually encoded.
pub fn create_thumbnail(
    backend: &dyn ImageBackend,
    source: &Path,
    output_path: &Path,
    source_dims: (u32, u32),
    request: SizeRequest,
    config: &ThumbnailConfig,
) -> Result<Dimensions> {
    let params = plan_thumbnail(source, output_path, source_dims, request, config);
    backend.resize(&params)
}
