use serde::{Deserialize, Serialize};

pub const DEFAULT_ELEMENT_ID: &str = "map-display-div-id";

pub const FULL_WINDOW_STYLE: &str =
    "display: block; position: absolute; top: 0; left: 0; height: 100vh; width: 100vw; margin: 0;";

pub const OSM_TILE_URL: &str = "http://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// The host element the map is painted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub element_id: String,
    /// Inline CSS applied to a created element. Full window by default.
    pub style: String,
    /// Create the element on first draw. Disable when the host page already has it.
    pub create_element: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            element_id: DEFAULT_ELEMENT_ID.to_string(),
            style: FULL_WINDOW_STYLE.to_string(),
            create_element: true,
        }
    }
}

impl SurfaceConfig {
    pub fn existing(element_id: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            create_element: false,
            ..Default::default()
        }
    }
}

/// Base tile layer attached when a map instance is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerConfig {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}
