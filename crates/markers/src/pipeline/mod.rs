pub mod builder;

use std::path::Path;

use image::RgbaImage;
use tracing::{debug, info};

use crate::{
    algorithms::BoundaryTracker,
    error::{MarkerError, Result},
    io::load_overlay,
    traits::RowScanner,
    types::MarkerLayout,
};

/// Turns an overlay image into the marker rectangles outlining its transparent area
pub struct Pipeline {
    scanner: Box<dyn RowScanner>,
    scanner_name: &'static str,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(scanner: Box<dyn RowScanner>, scanner_name: &'static str) -> Self {
        Self {
            scanner,
            scanner_name,
        }
    }

    /// Process a decoded RGBA image
    pub fn process(&self, image: &RgbaImage) -> Result<MarkerLayout> {
        if image.width() == 0 || image.height() == 0 {
            return Err(MarkerError::EmptyImage);
        }

        debug!(
            width = image.width(),
            height = image.height(),
            scanner = self.scanner_name,
            "tracing transparent region"
        );
        let markers = BoundaryTracker::trace(self.scanner.as_ref(), image);
        let layout = markers.into_layout(image.width(), image.height());

        info!(markers = layout.len(), "computed marker rectangles");
        Ok(layout)
    }

    /// Load an RGBA overlay from disk and process it
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<MarkerLayout> {
        let image = load_overlay(path)?;
        self.process(&image)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!("Pipeline: row scanner '{}'", self.scanner_name)
    }
}
