use std::path::Path;

use mapview_core::MapRenderConfig;
use mapview_renderer::{AssetConfig, EngineOptions, SurfaceConfig, TileLayerConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAPPER_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/gh/tmpk13/Simple-HTML-Map-Element-Maui@0.0.3/mapper.js";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Widget settings, usually stored as a small JSON file next to the host app.
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewSettings {
    /// Script that provides the in-page loader used by [`crate::loader_page`].
    pub loader_script_url: String,
    pub assets: AssetConfig,
    pub surface: SurfaceConfig,
    pub tiles: TileLayerConfig,
    /// Map drawn when the host supplies no data.
    pub defaults: MapRenderConfig,
}

impl Default for MapViewSettings {
    fn default() -> Self {
        Self {
            loader_script_url: MAPPER_SCRIPT_URL.to_string(),
            assets: AssetConfig::default(),
            surface: SurfaceConfig::default(),
            tiles: TileLayerConfig::default(),
            defaults: MapRenderConfig::default(),
        }
    }
}

impl MapViewSettings {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::default()
            .with_assets(self.assets.clone())
            .with_surface(self.surface.clone())
            .with_tiles(self.tiles.clone())
            .with_defaults(self.defaults.clone())
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapview_core::ViewportSpec;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = MapViewSettings::from_json("{}").unwrap();
        assert_eq!(settings, MapViewSettings::default());
        assert_eq!(settings.loader_script_url, MAPPER_SCRIPT_URL);
    }

    #[test]
    fn test_partial_override() {
        let settings = MapViewSettings::from_json(
            r#"{"surface": {"element_id": "host-map", "create_element": false},
                "assets": {"max_load_attempts": 3}}"#,
        )
        .unwrap();
        assert_eq!(settings.surface.element_id, "host-map");
        assert!(!settings.surface.create_element);
        assert_eq!(settings.assets.max_load_attempts, 3);
        assert!(settings.assets.inject);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = MapViewSettings::default();
        settings.defaults = MapRenderConfig::new(ViewportSpec::new(48.85, 2.35, 13.0)).with_marker(48.85, 2.35);
        let back = MapViewSettings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_engine_options_carry_settings() {
        let mut settings = MapViewSettings::default();
        settings.tiles.url_template = "https://tiles.example/{z}/{x}/{y}.png".to_string();
        let options = settings.engine_options();
        assert_eq!(options.tiles, settings.tiles);
        assert_eq!(options.defaults, settings.defaults);
    }
}
