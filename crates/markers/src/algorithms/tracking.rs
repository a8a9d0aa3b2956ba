use image::RgbaImage;
use strum::IntoEnumIterator;
use tracing::trace;

use crate::{
    rectangles::MarkerRectangleBuilder,
    traits::RowScanner,
    types::{MarkerId, RowInterval, Side},
};

/// Row-by-row fold that turns transparent intervals into marker rectangles.
///
/// Each side of the region keeps at most one open vertical marker. A boundary
/// column that stays put extends its marker, a column that moves gets a
/// horizontal link plus a fresh marker, and rows where the region appears or
/// disappears get a horizontal cap. Nothing is closed after the last row, so a
/// region touching the bottom edge has no bottom cap.
#[derive(Debug, Default)]
pub struct BoundaryTracker {
    builder: MarkerRectangleBuilder,
    open_left: Option<MarkerId>,
    open_right: Option<MarkerId>,
    previous: RowInterval,
    row: u32,
}

impl BoundaryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `scanner` over every row of `image` and collect the markers.
    pub fn trace<S>(scanner: &S, image: &RgbaImage) -> MarkerRectangleBuilder
    where
        S: RowScanner + ?Sized,
    {
        let mut tracker = Self::new();
        for y in 0..image.height() {
            tracker.push_row(scanner.scan_row(image, y));
        }
        tracker.finish()
    }

    /// Feed the interval of the next row, starting at row 0.
    pub fn push_row(&mut self, current: RowInterval) {
        let y = coord(self.row);

        if current.is_empty() {
            let previous = self.previous;
            if !previous.is_empty() {
                trace!(y, start = previous.start, end = previous.end, "bottom cap");
                self.builder
                    .append(coord(previous.start), y, coord(previous.width()), 1);
            }
            self.open_left = None;
            self.open_right = None;
        } else {
            if y > 0 && self.open_left.is_none() && self.open_right.is_none() {
                trace!(y, start = current.start, end = current.end, "top cap");
                self.builder
                    .append(coord(current.start), y - 1, coord(current.width()), 1);
            }
            for side in Side::iter() {
                self.track_side(side, current, y);
            }
        }

        self.previous = current;
        self.row += 1;
    }

    fn track_side(&mut self, side: Side, current: RowInterval, y: i32) {
        let Some(column) = boundary_column(side, current) else {
            return;
        };

        let open = *self.open_slot(side);
        if let Some(id) = open {
            let old_column = self.builder.get(id).map(|marker| marker.x);
            match old_column {
                Some(old_column) if old_column == column => {
                    self.builder.grow_height(id);
                    return;
                }
                Some(old_column) => {
                    let link_x = column.min(old_column);
                    let link_width = (column - old_column).abs() + 1;
                    let shrinking = match side {
                        Side::Left => column > old_column,
                        Side::Right => column < old_column,
                    };
                    let link_y = if shrinking { y } else { y - 1 };
                    trace!(%side, y, from = old_column, to = column, shrinking, "link");
                    self.builder.append(link_x, link_y, link_width, 1);
                }
                None => {}
            }
        }

        *self.open_slot(side) = self.builder.append(column, y, 1, 1);
    }

    fn open_slot(&mut self, side: Side) -> &mut Option<MarkerId> {
        match side {
            Side::Left => &mut self.open_left,
            Side::Right => &mut self.open_right,
        }
    }

    /// Marker currently extended for `side`, if any
    pub fn open_marker(&self, side: Side) -> Option<MarkerId> {
        match side {
            Side::Left => self.open_left,
            Side::Right => self.open_right,
        }
    }

    /// Number of rows consumed so far
    pub fn rows(&self) -> u32 {
        self.row
    }

    pub fn markers(&self) -> &MarkerRectangleBuilder {
        &self.builder
    }

    pub fn finish(self) -> MarkerRectangleBuilder {
        self.builder
    }
}

/// Column just outside the transparent run on `side`, if it gets a marker.
fn boundary_column(side: Side, interval: RowInterval) -> Option<i32> {
    match side {
        Side::Left => (interval.start > 0).then(|| coord(interval.start) - 1),
        // a single transparent pixel only gets a left marker
        Side::Right => (interval.end > interval.start + 1).then(|| coord(interval.end)),
    }
}

/// Image column or row as a marker coordinate, saturating at `i32::MAX`.
fn coord(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::CenterOutScanner, types::MarkerRectangle};
    use image::Rgba;

    fn image_with_holes(width: u32, height: u32, holes: &[(u32, u32, u32, u32)]) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let transparent = holes
                .iter()
                .any(|&(hx, hy, hw, hh)| x >= hx && x < hx + hw && y >= hy && y < hy + hh);
            if transparent { Rgba([0, 0, 0, 0]) } else { Rgba([255, 255, 255, 255]) }
        })
    }

    fn track(rows: &[(u32, u32)]) -> Vec<MarkerRectangle> {
        let mut tracker = BoundaryTracker::new();
        for &(start, end) in rows {
            tracker.push_row(RowInterval::new(start, end));
        }
        tracker.finish().as_slice().to_vec()
    }

    #[test]
    fn test_opaque_image_has_no_markers() {
        let image = image_with_holes(16, 12, &[]);
        let markers = BoundaryTracker::trace(&CenterOutScanner::default(), &image);
        assert!(markers.is_empty());
    }

    #[test]
    fn test_centered_square_hole() {
        let image = image_with_holes(5, 5, &[(1, 1, 3, 3)]);
        let markers = BoundaryTracker::trace(&CenterOutScanner::default(), &image);
        assert_eq!(
            markers.as_slice(),
            &[
                MarkerRectangle::new(1, 0, 3, 1),
                MarkerRectangle::new(0, 1, 1, 3),
                MarkerRectangle::new(4, 1, 1, 3),
                MarkerRectangle::new(1, 4, 3, 1),
            ]
        );
    }

    #[test]
    fn test_vertical_band_extends_instead_of_linking() {
        let height = 9;
        let image = image_with_holes(12, height, &[(4, 0, 5, height)]);
        let markers = BoundaryTracker::trace(&CenterOutScanner::default(), &image);
        // the band starts on row 0, so there is no row above it to cap
        assert_eq!(
            markers.as_slice(),
            &[
                MarkerRectangle::new(3, 0, 1, height as i32),
                MarkerRectangle::new(9, 0, 1, height as i32),
            ]
        );
    }

    #[test]
    fn test_band_below_first_row_gets_single_top_cap() {
        let image = image_with_holes(12, 6, &[(4, 1, 5, 5)]);
        let markers = BoundaryTracker::trace(&CenterOutScanner::default(), &image);
        let caps: Vec<_> = markers.as_slice().iter().filter(|m| m.is_horizontal()).collect();
        assert_eq!(caps, vec![&MarkerRectangle::new(4, 0, 5, 1)]);
        assert_eq!(markers.len(), 3);
    }

    #[test]
    fn test_left_edge_moving_inwards_links_on_current_row() {
        let markers = track(&[(11, 20), (14, 20)]);
        assert_eq!(
            markers,
            vec![
                MarkerRectangle::new(10, 0, 1, 1),
                MarkerRectangle::new(20, 0, 1, 2),
                MarkerRectangle::new(10, 1, 4, 1),
                MarkerRectangle::new(13, 1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_left_edge_moving_outwards_links_on_previous_row() {
        let markers = track(&[(14, 20), (11, 20)]);
        assert_eq!(markers[2], MarkerRectangle::new(10, 0, 4, 1));
        assert_eq!(markers[3], MarkerRectangle::new(10, 1, 1, 1));
    }

    #[test]
    fn test_right_edge_links() {
        let narrowing = track(&[(5, 20), (5, 16)]);
        assert_eq!(narrowing[2], MarkerRectangle::new(16, 1, 5, 1));
        assert_eq!(narrowing[3], MarkerRectangle::new(16, 1, 1, 1));

        let widening = track(&[(5, 16), (5, 20)]);
        assert_eq!(widening[2], MarkerRectangle::new(16, 0, 5, 1));
        assert_eq!(widening[3], MarkerRectangle::new(20, 1, 1, 1));
    }

    #[test]
    fn test_single_pixel_interval_has_only_left_marker() {
        let markers = track(&[(5, 6)]);
        assert_eq!(markers, vec![MarkerRectangle::new(4, 0, 1, 1)]);
    }

    #[test]
    fn test_interval_at_left_edge_has_only_right_marker() {
        let mut tracker = BoundaryTracker::new();
        tracker.push_row(RowInterval::new(0, 4));
        assert_eq!(tracker.open_marker(Side::Left), None);
        assert!(tracker.open_marker(Side::Right).is_some());
        assert_eq!(tracker.markers().as_slice(), &[MarkerRectangle::new(4, 0, 1, 1)]);
    }

    #[test]
    fn test_row_without_right_boundary_keeps_open_right_marker() {
        let mut tracker = BoundaryTracker::new();
        tracker.push_row(RowInterval::new(3, 8));
        let right = tracker.open_marker(Side::Right);
        // single transparent pixel: no right boundary on this row
        tracker.push_row(RowInterval::new(3, 4));
        assert_eq!(tracker.open_marker(Side::Right), right);
        tracker.push_row(RowInterval::new(3, 8));
        assert_eq!(tracker.open_marker(Side::Right), right);

        assert_eq!(
            tracker.markers().as_slice(),
            &[
                MarkerRectangle::new(2, 0, 1, 3),
                MarkerRectangle::new(8, 0, 1, 2),
            ]
        );
    }

    #[test]
    fn test_disjoint_intervals_in_adjacent_rows_link_both_edges() {
        let markers = track(&[(2, 4), (10, 14)]);
        assert_eq!(
            markers,
            vec![
                MarkerRectangle::new(1, 0, 1, 1),
                MarkerRectangle::new(4, 0, 1, 1),
                // left edge jumps right: link on the current row
                MarkerRectangle::new(1, 1, 9, 1),
                MarkerRectangle::new(9, 1, 1, 1),
                // right edge jumps right: link on the previous row
                MarkerRectangle::new(4, 0, 11, 1),
                MarkerRectangle::new(14, 1, 1, 1),
            ]
        );
        assert_eq!(markers.iter().filter(|m| m.is_horizontal()).count(), 2);
    }

    #[test]
    fn test_coordinates_saturate_above_i32_range() {
        assert_eq!(coord(7), 7);
        assert_eq!(coord(i32::MAX as u32), i32::MAX);
        assert_eq!(coord(u32::MAX), i32::MAX);
    }

    #[test]
    fn test_gap_row_closes_and_reopens() {
        let markers = track(&[(3, 8), (0, 0), (4, 9)]);
        assert_eq!(
            markers,
            vec![
                MarkerRectangle::new(2, 0, 1, 1),
                MarkerRectangle::new(8, 0, 1, 1),
                MarkerRectangle::new(3, 1, 5, 1),
                MarkerRectangle::new(4, 1, 5, 1),
                MarkerRectangle::new(3, 2, 1, 1),
                MarkerRectangle::new(9, 2, 1, 1),
            ]
        );
    }

    #[test]
    fn test_empty_row_resets_open_markers() {
        let mut tracker = BoundaryTracker::new();
        tracker.push_row(RowInterval::new(3, 8));
        tracker.push_row(RowInterval::EMPTY);
        assert_eq!(tracker.open_marker(Side::Left), None);
        assert_eq!(tracker.open_marker(Side::Right), None);
        assert_eq!(tracker.rows(), 2);
    }

    #[test]
    fn test_region_touching_bottom_is_left_open() {
        let markers = track(&[(0, 0), (3, 8), (3, 8)]);
        assert_eq!(
            markers,
            vec![
                MarkerRectangle::new(3, 0, 5, 1),
                MarkerRectangle::new(2, 1, 1, 2),
                MarkerRectangle::new(8, 1, 1, 2),
            ]
        );
    }

    #[test]
    fn test_tracing_is_deterministic() {
        let image = image_with_holes(40, 30, &[(10, 3, 20, 10), (14, 13, 12, 8), (8, 21, 25, 5)]);
        let scanner = CenterOutScanner::default();
        let first = BoundaryTracker::trace(&scanner, &image);
        let second = BoundaryTracker::trace(&scanner, &image);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
