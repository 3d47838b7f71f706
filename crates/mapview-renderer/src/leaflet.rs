//! Backend that writes Leaflet calls as script statements instead of
//! executing them, for embedding in a generated page.

use mapview_core::codec::escape_for_script_literal;
use mapview_core::{MarkerSpec, ViewportSpec};

use crate::assets::AssetConfig;
use crate::backend::{BackendError, MapBackend, MapHandle};
use crate::surface::{SurfaceConfig, TileLayerConfig};

#[derive(Debug, Default)]
pub struct LeafletScript {
    head: Vec<String>,
    statements: Vec<String>,
    next_map: u64,
}

impl LeafletScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<link>` / `<script>` tags for the document head.
    pub fn head_tags(&self) -> &[String] {
        &self.head
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// All statements, one per line.
    pub fn script(&self) -> String {
        self.statements.join("\n")
    }

    fn map_var(map: MapHandle) -> String {
        format!("map_{}", map.0)
    }
}

/// A double-quoted script string literal that cannot close its `<script>` element.
fn js_string(value: &str) -> Result<String, BackendError> {
    let quoted = serde_json::to_string(value).map_err(|e| BackendError(e.to_string()))?;
    Ok(escape_for_script_literal(&quoted))
}

fn js_number(value: f64) -> Result<String, BackendError> {
    if value.is_finite() {
        Ok(value.to_string())
    } else {
        Err(BackendError(format!("non-finite coordinate {}", value)))
    }
}

fn js_lat_lng(latitude: f64, longitude: f64) -> Result<String, BackendError> {
    Ok(format!("[{}, {}]", js_number(latitude)?, js_number(longitude)?))
}

/// Escape text for a double-quoted HTML attribute.
pub fn html_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

impl MapBackend for LeafletScript {
    fn load_assets(&mut self, assets: &AssetConfig) -> Result<(), BackendError> {
        if assets.inject && self.head.is_empty() {
            self.head.push(format!(
                "<link rel=\"stylesheet\" href=\"{}\">",
                html_attr(&assets.stylesheet_url)
            ));
            self.head.push(format!(
                "<script src=\"{}\"></script>",
                html_attr(&assets.script_url)
            ));
        }
        Ok(())
    }

    fn create_surface(&mut self, surface: &SurfaceConfig) -> Result<(), BackendError> {
        self.statements.push(format!(
            "(function () {{ var el = document.createElement(\"div\"); el.setAttribute(\"id\", {}); el.setAttribute(\"style\", {}); document.body.appendChild(el); }})();",
            js_string(&surface.element_id)?,
            js_string(&surface.style)?
        ));
        Ok(())
    }

    fn create_map(
        &mut self,
        element_id: &str,
        viewport: &ViewportSpec,
    ) -> Result<MapHandle, BackendError> {
        let map = MapHandle(self.next_map);
        self.next_map += 1;
        self.statements.push(format!(
            "var {} = L.map({}).setView({}, {});",
            Self::map_var(map),
            js_string(element_id)?,
            js_lat_lng(viewport.latitude, viewport.longitude)?,
            js_number(viewport.zoom_level)?
        ));
        Ok(map)
    }

    fn set_view(&mut self, map: MapHandle, viewport: &ViewportSpec) -> Result<(), BackendError> {
        self.statements.push(format!(
            "{}.setView({}, {});",
            Self::map_var(map),
            js_lat_lng(viewport.latitude, viewport.longitude)?,
            js_number(viewport.zoom_level)?
        ));
        Ok(())
    }

    fn add_tile_layer(
        &mut self,
        map: MapHandle,
        tiles: &TileLayerConfig,
    ) -> Result<(), BackendError> {
        self.statements.push(format!(
            "{}.addLayer(new L.TileLayer({}, {{ attribution: {} }}));",
            Self::map_var(map),
            js_string(&tiles.url_template)?,
            js_string(&tiles.attribution)?
        ));
        Ok(())
    }

    fn add_marker(&mut self, map: MapHandle, marker: &MarkerSpec) -> Result<(), BackendError> {
        self.statements.push(format!(
            "new L.Marker({}).addTo({});",
            js_lat_lng(marker.latitude, marker.longitude)?,
            Self::map_var(map)
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineOptions, RenderEngine};
    use mapview_core::MapRenderConfig;

    #[test]
    fn test_head_tags_from_assets() {
        let mut script = LeafletScript::new();
        script.load_assets(&AssetConfig::default()).unwrap();
        script.load_assets(&AssetConfig::default()).unwrap();
        assert_eq!(
            script.head_tags(),
            &[
                "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\">".to_string(),
                "<script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_head_tags_without_injection() {
        let mut script = LeafletScript::new();
        let assets = AssetConfig {
            inject: false,
            ..Default::default()
        };
        script.load_assets(&assets).unwrap();
        assert!(script.head_tags().is_empty());
    }

    #[test]
    fn test_engine_emits_draw_sequence() {
        let mut engine = RenderEngine::new(LeafletScript::new(), EngineOptions::default()).unwrap();
        engine
            .render_from_config(
                MapRenderConfig::new(ViewportSpec::new(45.0, -93.5, 10.0)).with_marker(45.1, -93.1),
            )
            .unwrap();
        engine.on_assets_loaded().unwrap();

        let statements = engine.backend().statements();
        assert_eq!(statements.len(), 4);
        assert!(statements[0].contains("document.createElement(\"div\")"));
        assert_eq!(
            statements[1],
            "var map_0 = L.map(\"map-display-div-id\").setView([45, -93.5], 10);"
        );
        assert!(statements[2].starts_with("map_0.addLayer(new L.TileLayer(\"http://tile.openstreetmap.org/{z}/{x}/{y}.png\""));
        assert_eq!(statements[3], "new L.Marker([45.1, -93.1]).addTo(map_0);");
    }

    #[test]
    fn test_strings_cannot_close_script() {
        let surface = SurfaceConfig {
            element_id: "x</script><script>alert(1)".to_string(),
            ..Default::default()
        };
        let mut script = LeafletScript::new();
        script.create_surface(&surface).unwrap();
        assert!(!script.script().contains("</script>"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut script = LeafletScript::new();
        assert!(script
            .create_map("m", &ViewportSpec::new(f64::INFINITY, 0.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_html_attr() {
        assert_eq!(html_attr("a\"b&c<d>'"), "a&quot;b&amp;c&lt;d&gt;&#39;");
    }
}
