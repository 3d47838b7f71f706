use serde::{Deserialize, Serialize};

/// Initial camera position of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSpec {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom_level: f64,
}

impl ViewportSpec {
    pub fn new(latitude: f64, longitude: f64, zoom_level: f64) -> Self {
        Self {
            latitude,
            longitude,
            zoom_level,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.zoom_level.is_finite()
    }
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// A single point marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub latitude: f64,
    pub longitude: f64,
}

impl MarkerSpec {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// The `[lat, long]` pair written on the wire.
    pub fn to_pair(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// A marker as it arrives from a producer: either `[lat, long]` or
/// `{"lat": .., "long": ..}`.
///
/// Resolved to a [`MarkerSpec`] once, at the boundary; nothing downstream
/// looks at the raw shape again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerShape {
    Pair([f64; 2]),
    Named { lat: f64, long: f64 },
}

impl MarkerShape {
    pub fn normalize(self) -> MarkerSpec {
        match self {
            MarkerShape::Pair([lat, long]) => MarkerSpec::new(lat, long),
            MarkerShape::Named { lat, long } => MarkerSpec::new(lat, long),
        }
    }
}

impl From<MarkerShape> for MarkerSpec {
    fn from(shape: MarkerShape) -> Self {
        shape.normalize()
    }
}

impl From<[f64; 2]> for MarkerSpec {
    fn from(pair: [f64; 2]) -> Self {
        MarkerSpec::new(pair[0], pair[1])
    }
}

/// Everything needed to draw one map: a viewport plus markers in display order.
///
/// Duplicated markers are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapRenderConfig {
    pub viewport: ViewportSpec,
    pub markers: Vec<MarkerSpec>,
}

impl MapRenderConfig {
    pub fn new(viewport: ViewportSpec) -> Self {
        Self {
            viewport,
            markers: Vec::new(),
        }
    }

    pub fn with_marker(mut self, latitude: f64, longitude: f64) -> Self {
        self.markers.push(MarkerSpec::new(latitude, longitude));
        self
    }

    pub fn with_markers<I, M>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MarkerSpec>,
    {
        self.markers.extend(markers.into_iter().map(Into::into));
        self
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_shapes_normalize_to_same_spec() {
        let pair = MarkerShape::Pair([45.1, -93.1]);
        let named = MarkerShape::Named {
            lat: 45.1,
            long: -93.1,
        };
        assert_eq!(pair.normalize(), named.normalize());
        assert_eq!(pair.normalize(), MarkerSpec::new(45.1, -93.1));
    }

    #[test]
    fn test_marker_shape_deserializes_both_forms() {
        let shapes: Vec<MarkerShape> =
            serde_json::from_str(r#"[[1.5, 2], {"lat": 3, "long": -4.25}]"#).unwrap();
        assert_eq!(shapes[0], MarkerShape::Pair([1.5, 2.0]));
        assert_eq!(
            shapes[1],
            MarkerShape::Named {
                lat: 3.0,
                long: -4.25
            }
        );
    }

    #[test]
    fn test_config_builder_keeps_order_and_duplicates() {
        let config = MapRenderConfig::new(ViewportSpec::new(1.0, 2.0, 3.0))
            .with_marker(1.0, 1.0)
            .with_markers([[2.0, 2.0], [1.0, 1.0]]);
        assert_eq!(config.marker_count(), 3);
        assert_eq!(config.markers[0], config.markers[2]);
        assert_eq!(config.markers[1], MarkerSpec::new(2.0, 2.0));
    }

    #[test]
    fn test_default_viewport_is_origin() {
        let vp = ViewportSpec::default();
        assert_eq!(vp, ViewportSpec::new(0.0, 0.0, 0.0));
        assert!(vp.is_finite());
        assert!(!ViewportSpec::new(f64::NAN, 0.0, 1.0).is_finite());
    }
}
