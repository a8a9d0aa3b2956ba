use std::path::Path;

use geo_types::{Polygon, Rect};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::{
    error::{MarkerError, Result},
    types::{MarkerLayout, MarkerRectangle},
};

impl MarkerRectangle {
    /// Pixel footprint of the marker as a geo-types polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(
            (self.x as f64, self.y as f64),
            (self.right() as f64, self.bottom() as f64),
        )
        .to_polygon()
    }
}

impl MarkerLayout {
    /// Export every marker as a polygon feature
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .iter()
            .map(|(id, marker)| {
                let geometry = Geometry::new(Value::from(&marker.to_polygon()));

                let mut properties = Map::new();
                properties.insert("id".to_string(), JsonValue::from(id.index()));
                properties.insert("x".to_string(), JsonValue::from(marker.x));
                properties.insert("y".to_string(), JsonValue::from(marker.y));
                properties.insert("width".to_string(), JsonValue::from(marker.width));
                properties.insert("height".to_string(), JsonValue::from(marker.height));

                Feature {
                    bbox: None,
                    geometry: Some(geometry),
                    id: Some(geojson::feature::Id::Number(Number::from(id.index()))),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        let mut foreign_members = Map::new();
        foreign_members.insert("image_width".to_string(), JsonValue::from(self.image_width));
        foreign_members.insert("image_height".to_string(), JsonValue::from(self.image_height));
        foreign_members.insert("marker_count".to_string(), JsonValue::from(self.len()));

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    pub fn save_geojson<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }

    /// Rebuild a layout from GeoJSON written by [`MarkerLayout::save_geojson`].
    ///
    /// Marker geometry is read from the feature properties, feature order is kept.
    pub fn from_geojson_string(content: &str) -> Result<Self> {
        let collection: FeatureCollection = content.parse()?;

        let metadata = collection
            .foreign_members
            .as_ref()
            .ok_or_else(|| MarkerError::InvalidGeoJson("missing image metadata".to_string()))?;
        let dimension = |key: &str| {
            metadata
                .get(key)
                .and_then(JsonValue::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| MarkerError::InvalidGeoJson(format!("missing or invalid {key}")))
        };
        let image_width = dimension("image_width")?;
        let image_height = dimension("image_height")?;

        let markers = collection
            .features
            .iter()
            .map(|feature| -> Result<MarkerRectangle> {
                let field = |key: &str| {
                    feature
                        .property(key)
                        .and_then(JsonValue::as_i64)
                        .and_then(|v| i32::try_from(v).ok())
                        .ok_or_else(|| {
                            MarkerError::InvalidGeoJson(format!("feature without integer '{key}'"))
                        })
                };
                Ok(MarkerRectangle::new(
                    field("x")?,
                    field("y")?,
                    field("width")?,
                    field("height")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MarkerLayout {
            markers,
            image_width,
            image_height,
        })
    }

    pub fn from_geojson_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_geojson_string(&content)
    }
}
