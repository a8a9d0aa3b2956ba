use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use crate::types::{MarkerLayout, MarkerRectangle};

/// Default marker color, a light red that stands out on most overlays
pub const MARKER_COLOR: Rgba<u8> = Rgba([255, 128, 128, 255]);

impl MarkerRectangle {
    fn to_draw_rect(&self) -> Option<Rect> {
        if self.width <= 0 || self.height <= 0 {
            return None;
        }
        Some(Rect::at(self.x, self.y).of_size(self.width as u32, self.height as u32))
    }
}

impl MarkerLayout {
    /// Paint every marker onto `canvas` as a solid rectangle, clipped to the canvas
    pub fn render_onto(&self, canvas: &mut RgbaImage, color: Rgba<u8>) {
        for rect in self.markers.iter().filter_map(MarkerRectangle::to_draw_rect) {
            draw_filled_rect_mut(canvas, rect, color);
        }
    }

    /// Copy of `overlay` with the markers painted on top
    pub fn render_preview(&self, overlay: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
        let mut canvas = overlay.clone();
        self.render_onto(&mut canvas, color);
        canvas
    }

    /// Markers alone on a fully transparent canvas of the original image size
    pub fn render_mask(&self, color: Rgba<u8>) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.image_width, self.image_height);
        self.render_onto(&mut canvas, color);
        canvas
    }
}
