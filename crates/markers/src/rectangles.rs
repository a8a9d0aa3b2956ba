use crate::types::{MarkerId, MarkerLayout, MarkerRectangle};

/// Append-only list of marker rectangles.
///
/// Ids returned by [`append`](Self::append) stay valid for the lifetime of the
/// builder: rectangles are never removed or reordered, and only their height
/// can change after insertion. Storage is a `Vec`, so growth is amortized and
/// an allocation failure aborts the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerRectangleBuilder {
    rectangles: Vec<MarkerRectangle>,
}

impl MarkerRectangleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rectangles: Vec::with_capacity(capacity),
        }
    }

    /// Append a rectangle and return its id.
    ///
    /// Zero or negative sized rectangles are rejected with `None`.
    pub fn append(&mut self, x: i32, y: i32, width: i32, height: i32) -> Option<MarkerId> {
        if width <= 0 || height <= 0 {
            return None;
        }
        self.rectangles.push(MarkerRectangle::new(x, y, width, height));
        Some(MarkerId(self.rectangles.len() - 1))
    }

    /// Extend the rectangle `id` downwards by one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this builder.
    pub fn grow_height(&mut self, id: MarkerId) {
        self.rectangles[id.0].height += 1;
    }

    pub fn get(&self, id: MarkerId) -> Option<&MarkerRectangle> {
        self.rectangles.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.rectangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }

    pub fn as_slice(&self) -> &[MarkerRectangle] {
        &self.rectangles
    }

    pub fn into_layout(self, image_width: u32, image_height: u32) -> MarkerLayout {
        MarkerLayout {
            markers: self.rectangles,
            image_width,
            image_height,
        }
    }
}
