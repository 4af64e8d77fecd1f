//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode** | format inferred from the output extension |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend
//!
//! Nothing outside this module and the thumbnail plugin knows that images
//! exist; the pipeline only sees resources and capabilities.

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{SizeRequest, calculate_thumb_dimensions};
pub use operations::{ThumbnailConfig, create_thumbnail, get_dimensions, plan_thumbnail};
pub use params::{Quality, ResizeParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
