use image::RgbaImage;
use crate::{traits::RowScanner, types::RowInterval};

/// Alpha value at or above which a pixel counts as opaque
pub const FULLY_OPAQUE: u8 = u8::MAX;

/// Scanner that looks for the transparent run starting at the horizontal
/// center of the row, assuming the visible area of an overlay is roughly
/// centered.
#[derive(Debug, Clone)]
pub struct CenterOutScanner {
    pub opaque_alpha: u8,
}

impl Default for CenterOutScanner {
    fn default() -> Self {
        Self { opaque_alpha: FULLY_OPAQUE }
    }
}

impl CenterOutScanner {
    pub fn new(opaque_alpha: u8) -> Self {
        Self { opaque_alpha }
    }

    fn is_transparent(&self, image: &RgbaImage, x: u32, y: u32) -> bool {
        image.get_pixel(x, y).0[3] < self.opaque_alpha
    }
}

impl RowScanner for CenterOutScanner {
    fn scan_row(&self, image: &RgbaImage, y: u32) -> RowInterval {
        let width = image.width();
        if width == 0 {
            return RowInterval::EMPTY;
        }
        let center = width / 2;

        let (start, mut end) = if self.is_transparent(image, center, y) {
            // walk left from the center while the run continues
            let mut start = center;
            while start > 0 && self.is_transparent(image, start - 1, y) {
                start -= 1;
            }
            (start, center + 1)
        } else {
            match (center..width).find(|&x| self.is_transparent(image, x, y)) {
                Some(x) => (x, x + 1),
                None => return RowInterval::EMPTY,
            }
        };

        while end < width && self.is_transparent(image, end, y) {
            end += 1;
        }

        RowInterval::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const OPAQUE: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn row_image(pattern: &str) -> RgbaImage {
        let bytes = pattern.as_bytes();
        RgbaImage::from_fn(bytes.len() as u32, 1, |x, _| {
            if bytes[x as usize] == b'.' { CLEAR } else { OPAQUE }
        })
    }

    fn scan(pattern: &str) -> RowInterval {
        CenterOutScanner::default().scan_row(&row_image(pattern), 0)
    }

    #[test]
    fn test_fully_opaque_row_is_empty() {
        assert_eq!(scan("##########"), RowInterval::EMPTY);
    }

    #[test]
    fn test_run_through_center_extends_both_ways() {
        // center of a 10 pixel row is column 5
        assert_eq!(scan("##......##"), RowInterval::new(2, 8));
    }

    #[test]
    fn test_fully_transparent_row_spans_whole_width() {
        assert_eq!(scan("........"), RowInterval::new(0, 8));
    }

    #[test]
    fn test_run_right_of_center() {
        assert_eq!(scan("#######..#"), RowInterval::new(7, 9));
    }

    #[test]
    fn test_run_left_of_center_is_not_found() {
        // the left walk stops at the opaque center pixel
        assert_eq!(scan("#..#######"), RowInterval::EMPTY);
    }

    #[test]
    fn test_run_ending_at_center() {
        assert_eq!(scan("##....####"), RowInterval::new(2, 6));
    }

    #[test]
    fn test_only_first_run_right_of_center() {
        assert_eq!(scan("######.#.."), RowInterval::new(6, 7));
    }

    #[test]
    fn test_single_pixel_image() {
        assert_eq!(scan("."), RowInterval::new(0, 1));
        assert_eq!(scan("#"), RowInterval::EMPTY);
    }

    #[test]
    fn test_partial_alpha_counts_as_transparent() {
        let mut image = row_image("####");
        image.put_pixel(2, 0, Rgba([10, 10, 10, 254]));
        assert_eq!(
            CenterOutScanner::default().scan_row(&image, 0),
            RowInterval::new(2, 3)
        );
        assert_eq!(CenterOutScanner::new(200).scan_row(&image, 0), RowInterval::EMPTY);
    }
}
