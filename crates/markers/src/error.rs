use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Unexpected number of components in image '{path}' (is {found}; expected {expected})")]
    UnexpectedChannels {
        path: String,
        expected: u8,
        found: u8,
    },

    #[error("Image has zero width or height")]
    EmptyImage,

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Invalid marker GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarkerError>;
