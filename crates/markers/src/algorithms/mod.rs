pub mod scanning;
pub mod tracking;

pub use scanning::*;
pub use tracking::*;

use image::RgbaImage;
use crate::types::MarkerLayout;

/// Trace the transparent region of `image` with the default center-out scanner.
pub fn trace_markers(image: &RgbaImage) -> MarkerLayout {
    BoundaryTracker::trace(&CenterOutScanner::default(), image)
        .into_layout(image.width(), image.height())
}
