use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// The transparent run found in a single image row, as a half-open `[start, end)` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RowInterval {
    pub start: u32,
    pub end: u32,
}

impl RowInterval {
    /// The canonical "no transparency in this row" value.
    pub const EMPTY: RowInterval = RowInterval { start: 0, end: 0 };

    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of transparent pixels in the run (0 when empty)
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Stable index of a rectangle inside a [`crate::MarkerRectangleBuilder`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct MarkerId(pub(crate) usize);

impl MarkerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One boundary edge of the tracked transparent region.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// A thin axis-aligned marker strip in image/screen coordinates.
///
/// Vertical markers are one pixel wide and grow downwards while a boundary
/// column persists; caps and links are one pixel tall.
///
/// Coordinates are `i32`; image columns and rows above `i32::MAX` saturate
/// to `i32::MAX` when converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct MarkerRectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl MarkerRectangle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn is_horizontal(&self) -> bool {
        self.height == 1 && self.width > 1
    }

    pub fn is_vertical(&self) -> bool {
        self.width == 1 && self.height > 1
    }

    /// Check if the pixel at `(x, y)` is covered by this marker
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Markers computed for one overlay image, in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarkerLayout {
    pub markers: Vec<MarkerRectangle>,
    /// Original image dimensions
    pub image_width: u32,
    pub image_height: u32,
}

impl MarkerLayout {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: MarkerId) -> Option<&MarkerRectangle> {
        self.markers.get(id.0)
    }

    /// Iterate over markers together with their stable ids
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &MarkerRectangle)> {
        self.markers
            .iter()
            .enumerate()
            .map(|(index, marker)| (MarkerId(index), marker))
    }

    /// Total number of pixels covered by all markers (overlaps counted twice)
    pub fn covered_pixels(&self) -> i64 {
        self.markers.iter().map(MarkerRectangle::area).sum()
    }
}
