//! Pure calculation functions for thumbnail dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Requested output size. Either side may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SizeRequest {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// No constraint: keep the native size.
    pub fn native() -> Self {
        Self::default()
    }

    pub fn width(width: u32) -> Self {
        Self::new(Some(width), None)
    }

    pub fn height(height: u32) -> Self {
        Self::new(None, Some(height))
    }

    pub fn bounded(width: u32, height: u32) -> Self {
        Self::new(Some(width), Some(height))
    }
}

/// Scale `value` by `num / den`, rounded to the nearest pixel, never below 1.
fn scale(value: u32, num: u32, den: u32) -> u32 {
    ((value as f64 * num as f64 / den as f64).round() as u32).max(1)
}

/// Calculate the output dimensions of a thumbnail.
///
/// # Arguments
/// * `source` - Native image dimensions (width, height)
/// * `request` - Requested width and/or height
///
/// # Returns
/// * `(width, height)` - Final thumbnail dimensions
///
/// Rules:
/// - nothing requested → the native size
/// - one side requested → the other follows the source aspect ratio
/// - both requested → fit inside the box; the side that is the tighter
///   constraint is kept exactly, the other is derived and never exceeds
///   its bound
///
/// # Examples
/// ```
/// # use sitewright::imaging::{SizeRequest, calculate_thumb_dimensions};
/// // 800x600 at height 400 → 533x400
/// assert_eq!(calculate_thumb_dimensions((800, 600), SizeRequest::height(400)), (533, 400));
///
/// // 800x600 into a 30x40 box → width is the tighter side
/// assert_eq!(calculate_thumb_dimensions((800, 600), SizeRequest::bounded(30, 40)), (30, 23));
/// ```
pub fn calculate_thumb_dimensions(source: (u32, u32), request: SizeRequest) -> (u32, u32) {
    let (src_w, src_h) = source;

    match (request.width, request.height) {
        (None, None) => (src_w, src_h),
        (Some(w), None) => (w, scale(w, src_h, src_w)),
        (None, Some(h)) => (scale(h, src_w, src_h), h),
        (Some(w), Some(h)) => {
            // Compare src_w/src_h against w/h without dividing
            let source_wider = src_w as u64 * h as u64 > w as u64 * src_h as u64;
            if source_wider {
                // Width is the binding side
                (w, scale(w, src_h, src_w).min(h))
            } else {
                (scale(h, src_w, src_h).min(w), h)
            }
        }
    }
}
