use serde::{Deserialize, Serialize};

pub const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
pub const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";

/// Where the tile library's executable and stylesheet come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub script_url: String,
    pub stylesheet_url: String,
    /// Inject the script and stylesheet into the document. When false the host
    /// page is expected to provide the library itself.
    pub inject: bool,
    /// Total load attempts before giving up (the first load counts).
    pub max_load_attempts: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            script_url: LEAFLET_JS_URL.to_string(),
            stylesheet_url: LEAFLET_CSS_URL.to_string(),
            inject: true,
            max_load_attempts: 1,
        }
    }
}

impl AssetConfig {
    pub fn with_max_load_attempts(mut self, attempts: u32) -> Self {
        self.max_load_attempts = attempts.max(1);
        self
    }
}

/// Progress of the tile library load for one engine.
///
/// Moves forward only: `NotStarted -> Loading -> Ready`, or `Loading -> Failed`
/// once every allowed attempt has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetLoadState {
    NotStarted,
    Loading,
    Ready,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_defaults() {
        let assets = AssetConfig::default();
        assert_eq!(assets.script_url, LEAFLET_JS_URL);
        assert_eq!(assets.stylesheet_url, LEAFLET_CSS_URL);
        assert!(assets.inject);
        assert_eq!(assets.max_load_attempts, 1);
    }

    #[test]
    fn test_max_load_attempts_at_least_one() {
        assert_eq!(AssetConfig::default().with_max_load_attempts(0).max_load_attempts, 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let assets: AssetConfig = serde_json::from_str(r#"{"inject": false}"#).unwrap();
        assert!(!assets.inject);
        assert_eq!(assets.script_url, LEAFLET_JS_URL);
    }
}
