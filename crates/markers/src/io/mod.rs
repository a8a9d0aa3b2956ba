pub mod geojson;
pub mod json;
pub mod loader;

pub use loader::{load_background, load_overlay};
