use countdown::{Countdown, CountdownError};
use image::{Rgba, RgbImage, RgbaImage};
use markers::{MarkerError, MarkerLayout, Pipeline, load_background, load_overlay};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum OverheadError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Marker(#[from] MarkerError),
    #[error(transparent)]
    Countdown(#[from] CountdownError),
    #[error("Failed to write image: {0}")]
    ImageWrite(#[from] image::ImageError),
    #[error("Panel size must be positive (got {width}x{height})")]
    InvalidPanelSize { width: u32, height: u32 },
    #[error("Marker outputs were requested but no overlay image is configured")]
    MissingOverlay,
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Where computed markers are written
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OutputPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers_json: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers_geojson: Option<PathBuf>,
    /// PNG of the overlay with the markers painted on top
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_png: Option<PathBuf>,
}

impl OutputPaths {
    pub fn is_empty(&self) -> bool {
        self.markers_json.is_none() && self.markers_geojson.is_none() && self.preview_png.is_none()
    }
}

/// Overhead display configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OverheadConfig {
    /// Countdown panel position
    pub x: i32,
    pub y: i32,
    /// Countdown panel size, replaced by the background image size when one is set
    pub width: u32,
    pub height: u32,
    /// Countdown length in minutes, 0 disables the countdown
    #[schemars(range(max = 1439))]
    pub countdown_minutes: u32,
    /// RGB image drawn behind the countdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<PathBuf>,
    /// RGBA overlay whose transparent area gets outlined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<PathBuf>,
    /// Alpha level from which overlay pixels count as opaque
    pub opaque_alpha: u8,
    pub marker_color: [u8; 3],
    pub outputs: OutputPaths,
}

impl Default for OverheadConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 150,
            height: 25,
            countdown_minutes: 0,
            background: None,
            overlay: None,
            opaque_alpha: u8::MAX,
            marker_color: [255, 128, 128],
            outputs: OutputPaths::default(),
        }
    }
}

/// Position and size of the countdown panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Everything loaded and computed before the display starts
#[derive(Debug)]
pub struct OverheadPlan {
    pub panel: PanelGeometry,
    pub background: Option<RgbImage>,
    pub overlay: Option<RgbaImage>,
    pub markers: Option<MarkerLayout>,
    pub countdown: Option<Countdown>,
}

impl OverheadConfig {
    /// Load OverheadConfig configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, OverheadError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load OverheadConfig configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, OverheadError> {
        Ok(toml::from_str(content)?)
    }

    /// Load OverheadConfig configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, OverheadError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load OverheadConfig configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, OverheadError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OverheadError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(OverheadError::UnsupportedFileFormat),
        }
    }

    /// Convert OverheadConfig to TOML string
    pub fn to_toml(&self) -> Result<String, OverheadError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert OverheadConfig to JSON string
    pub fn to_json(&self) -> Result<String, OverheadError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Save OverheadConfig configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), OverheadError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Save OverheadConfig configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), OverheadError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(OverheadConfig)
    }

    pub fn marker_rgba(&self) -> Rgba<u8> {
        let [r, g, b] = self.marker_color;
        Rgba([r, g, b, 255])
    }

    /// Load the images, compute the markers and start the countdown
    pub fn prepare(&self) -> Result<OverheadPlan, OverheadError> {
        let mut panel = PanelGeometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        };

        let background = match &self.background {
            Some(path) => {
                let image = load_background(path)?;
                debug!(path = %path.display(), width = image.width(), height = image.height(), "loaded background");
                panel.width = image.width();
                panel.height = image.height();
                Some(image)
            }
            None => None,
        };
        if panel.width == 0 || panel.height == 0 {
            return Err(OverheadError::InvalidPanelSize {
                width: panel.width,
                height: panel.height,
            });
        }

        let (overlay, markers) = match &self.overlay {
            Some(path) => {
                let image = load_overlay(path)?;
                let pipeline = Pipeline::builder().with_opaque_alpha(self.opaque_alpha).build();
                let layout = pipeline.process(&image)?;
                info!(path = %path.display(), markers = layout.len(), "traced overlay");
                (Some(image), Some(layout))
            }
            None => (None, None),
        };

        let countdown = if self.countdown_minutes > 0 {
            Some(Countdown::start_now(self.countdown_minutes)?)
        } else {
            None
        };

        Ok(OverheadPlan {
            panel,
            background,
            overlay,
            markers,
            countdown,
        })
    }
}

impl OverheadPlan {
    /// Write the requested marker outputs and return how many files were written
    pub fn write_outputs(&self, outputs: &OutputPaths, color: Rgba<u8>) -> Result<usize, OverheadError> {
        if outputs.is_empty() {
            return Ok(0);
        }
        let (Some(layout), Some(overlay)) = (&self.markers, &self.overlay) else {
            return Err(OverheadError::MissingOverlay);
        };
        write_marker_outputs(layout, overlay, outputs, color)
    }
}

/// Write `layout` to every configured output path
pub fn write_marker_outputs(
    layout: &MarkerLayout,
    overlay: &RgbaImage,
    outputs: &OutputPaths,
    color: Rgba<u8>,
) -> Result<usize, OverheadError> {
    let mut written = 0;
    if let Some(path) = &outputs.markers_json {
        layout.save_json(path)?;
        info!("📄 Markers saved to: {:?}", path);
        written += 1;
    }
    if let Some(path) = &outputs.markers_geojson {
        layout.save_geojson(path)?;
        info!("🗺️ GeoJSON saved to: {:?}", path);
        written += 1;
    }
    if let Some(path) = &outputs.preview_png {
        layout.render_preview(overlay, color).save(path)?;
        info!("🖼️ Preview saved to: {:?}", path);
        written += 1;
    }
    Ok(written)
}
