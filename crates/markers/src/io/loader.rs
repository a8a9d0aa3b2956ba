use std::path::Path;

use image::{DynamicImage, RgbImage, RgbaImage};
use tracing::debug;

use crate::error::{MarkerError, Result};

/// Load an overlay image. Only images with an alpha channel (4 components) are accepted.
pub fn load_overlay<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let image = open_with_channels(path.as_ref(), 4)?;
    Ok(image.to_rgba8())
}

/// Load a countdown background image. Only RGB images without alpha are accepted.
pub fn load_background<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let image = open_with_channels(path.as_ref(), 3)?;
    Ok(image.to_rgb8())
}

fn open_with_channels(path: &Path, expected: u8) -> Result<DynamicImage> {
    let image = image::open(path)?;
    let found = image.color().channel_count();
    debug!(path = %path.display(), width = image.width(), height = image.height(), channels = found, "loaded image");

    if found != expected {
        return Err(MarkerError::UnexpectedChannels {
            path: path.display().to_string(),
            expected,
            found,
        });
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(MarkerError::EmptyImage);
    }
    Ok(image)
}
