//! # Overlay Marker Library
//!
//! Finds the transparent area of an RGBA overlay image and describes its
//! outline as a short list of thin axis-aligned rectangles. Each rectangle can
//! be shown as its own always-on-top strip, so the outline stays visible
//! without a compositing window manager.
//!
//! ## Core Features
//!
//! - **Center-out row scanning**: one transparent run per row, searched from the image center
//! - **Boundary tracking**: vertical markers grow while an edge column persists,
//!   horizontal caps and links close the outline where the edge moves
//! - **Stable ids**: markers are append-only, ids never change
//! - **Outputs**: JSON, GeoJSON and PNG previews
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use markers::Pipeline;
//!
//! let pipeline = Pipeline::builder().build();
//! let layout = pipeline.process_file("overlay.png")?;
//!
//! for (id, marker) in layout.iter() {
//!     println!("{}: {}x{} at ({}, {})", id.index(), marker.width, marker.height, marker.x, marker.y);
//! }
//! layout.save_geojson("markers.geojson")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The algorithm is a heuristic for a single, roughly centered transparent
//! region. Each row reports one run: the one through the center column, or
//! else the first one to its right.

pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod rectangles;
pub mod pipeline;
pub mod io;
pub mod render;

pub use error::{MarkerError, Result};
pub use types::{MarkerId, MarkerLayout, MarkerRectangle, RowInterval, Side};
pub use traits::*;
pub use algorithms::*;
pub use rectangles::MarkerRectangleBuilder;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::{load_background, load_overlay};
pub use render::MARKER_COLOR;

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Overlay with an opaque frame and a stepped window: wide at the top, narrower below.
    fn create_test_overlay() -> RgbaImage {
        RgbaImage::from_fn(40, 30, |x, y| {
            let transparent = match y {
                4..=11 => (8..32).contains(&x),
                12..=21 => (12..28).contains(&x),
                _ => false,
            };
            if transparent { Rgba([0, 0, 0, 0]) } else { Rgba([30, 30, 30, 255]) }
        })
    }

    #[test]
    fn test_pipeline_basic() {
        let pipeline = Pipeline::builder().build();
        let image = create_test_overlay();

        let layout = pipeline.process(&image).expect("Should process successfully");
        assert_eq!(layout.image_width, 40);
        assert_eq!(layout.image_height, 30);
        assert_eq!(
            layout.markers,
            vec![
                // top cap above row 4
                MarkerRectangle::new(8, 3, 24, 1),
                MarkerRectangle::new(7, 4, 1, 8),
                MarkerRectangle::new(32, 4, 1, 8),
                // both edges step inwards on row 12
                MarkerRectangle::new(7, 12, 5, 1),
                MarkerRectangle::new(11, 12, 1, 10),
                MarkerRectangle::new(28, 12, 5, 1),
                MarkerRectangle::new(28, 12, 1, 10),
                // bottom cap on the first opaque row
                MarkerRectangle::new(12, 22, 16, 1),
            ]
        );
    }

    #[test]
    fn test_markers_outline_without_covering_window() {
        let image = create_test_overlay();
        let layout = trace_markers(&image);
        for marker in &layout.markers {
            for y in marker.y..marker.bottom() {
                for x in marker.x..marker.right() {
                    let alpha = image.get_pixel(x as u32, y as u32).0[3];
                    assert_eq!(alpha, 255, "marker {:?} covers transparent ({}, {})", marker, x, y);
                }
            }
        }
    }

    #[test]
    fn test_tracker_matches_pipeline() {
        let image = create_test_overlay();
        let direct = BoundaryTracker::trace(&CenterOutScanner::default(), &image);
        let layout = Pipeline::builder().build().process(&image).expect("Should process");
        assert_eq!(direct.as_slice(), layout.markers.as_slice());
    }
}
