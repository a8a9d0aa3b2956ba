use image::RgbaImage;
use crate::types::RowInterval;

/// Trait for per-row transparency detection
pub trait RowScanner: Send + Sync {
    /// Find the transparent run of row `y`. `y` must be below the image height.
    fn scan_row(&self, image: &RgbaImage, y: u32) -> RowInterval;
}
