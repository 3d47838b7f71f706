use mapview_core::{MarkerSpec, ViewportSpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetConfig;
use crate::surface::{SurfaceConfig, TileLayerConfig};

/// Opaque reference to a map instance owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapHandle(pub u64);

/// A call into the tile library failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct BackendError(pub String);

/// The external tile-rendering library, as seen by the render engine.
///
/// Calls other than [`MapBackend::load_assets`] are only issued after the
/// host has reported that the load finished.
pub trait MapBackend {
    /// Begin fetching the library script and stylesheet. Completion is
    /// reported back through `RenderEngine::on_assets_loaded`.
    fn load_assets(&mut self, assets: &AssetConfig) -> Result<(), BackendError>;

    /// Create the host element described by `surface`.
    fn create_surface(&mut self, surface: &SurfaceConfig) -> Result<(), BackendError>;

    /// Create a map inside `element_id`, centred on `viewport`.
    fn create_map(
        &mut self,
        element_id: &str,
        viewport: &ViewportSpec,
    ) -> Result<MapHandle, BackendError>;

    /// Move an existing map to `viewport`.
    fn set_view(&mut self, map: MapHandle, viewport: &ViewportSpec) -> Result<(), BackendError>;

    fn add_tile_layer(&mut self, map: MapHandle, tiles: &TileLayerConfig)
        -> Result<(), BackendError>;

    fn add_marker(&mut self, map: MapHandle, marker: &MarkerSpec) -> Result<(), BackendError>;
}

/// One call received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    LoadAssets { script_url: String, stylesheet_url: String },
    CreateSurface { element_id: String },
    CreateMap { map: MapHandle, element_id: String, viewport: ViewportSpec },
    SetView { map: MapHandle, viewport: ViewportSpec },
    AddTileLayer { map: MapHandle, url_template: String },
    AddMarker { map: MapHandle, marker: MarkerSpec },
}

/// Backend that performs no drawing and keeps a journal of every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    next_map: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Markers in the order they were placed.
    pub fn placed_markers(&self) -> Vec<MarkerSpec> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::AddMarker { marker, .. } => Some(*marker),
                _ => None,
            })
            .collect()
    }

    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::LoadAssets { .. }))
            .count()
    }
}

impl MapBackend for RecordingBackend {
    fn load_assets(&mut self, assets: &AssetConfig) -> Result<(), BackendError> {
        self.calls.push(BackendCall::LoadAssets {
            script_url: assets.script_url.clone(),
            stylesheet_url: assets.stylesheet_url.clone(),
        });
        Ok(())
    }

    fn create_surface(&mut self, surface: &SurfaceConfig) -> Result<(), BackendError> {
        self.calls.push(BackendCall::CreateSurface {
            element_id: surface.element_id.clone(),
        });
        Ok(())
    }

    fn create_map(
        &mut self,
        element_id: &str,
        viewport: &ViewportSpec,
    ) -> Result<MapHandle, BackendError> {
        let map = MapHandle(self.next_map);
        self.next_map += 1;
        self.calls.push(BackendCall::CreateMap {
            map,
            element_id: element_id.to_string(),
            viewport: *viewport,
        });
        Ok(map)
    }

    fn set_view(&mut self, map: MapHandle, viewport: &ViewportSpec) -> Result<(), BackendError> {
        self.calls.push(BackendCall::SetView {
            map,
            viewport: *viewport,
        });
        Ok(())
    }

    fn add_tile_layer(
        &mut self,
        map: MapHandle,
        tiles: &TileLayerConfig,
    ) -> Result<(), BackendError> {
        self.calls.push(BackendCall::AddTileLayer {
            map,
            url_template: tiles.url_template.clone(),
        });
        Ok(())
    }

    fn add_marker(&mut self, map: MapHandle, marker: &MarkerSpec) -> Result<(), BackendError> {
        self.calls.push(BackendCall::AddMarker {
            map,
            marker: *marker,
        });
        Ok(())
    }
}
