//! Deferred render engine.
//!
//! One engine owns one map surface. Construction starts the tile library
//! load right away; every draw request that arrives before the host reports
//! completion is captured in a FIFO [`CommandQueue`] and replayed, oldest
//! first and exactly once, when [`RenderEngine::on_assets_loaded`] fires.
//! After that, requests run immediately.

use mapview_core::{codec, CodecError, MapRenderConfig, MarkerSpec, ViewportSpec};
use thiserror::Error;
use uuid::Uuid;

use crate::assets::{AssetConfig, AssetLoadState};
use crate::backend::{BackendError, MapBackend, MapHandle};
use crate::commands::{CommandQueue, DrawCommand};
use crate::surface::{SurfaceConfig, TileLayerConfig};

/// Unique engine (widget) identifier, used in logs.
pub type EngineId = Uuid;

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Marker requested before any viewport was drawn")]
    MissingViewport,

    #[error("Tile library failed to load after {attempts} attempt(s): {reason}")]
    AssetLoadFailed { attempts: u32, reason: String },

    #[error("Tile library is unavailable; earlier load failed")]
    AssetsFailed,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Tile library call failed: {0}")]
    Backend(#[from] BackendError),
}

// ── Options ───────────────────────────────────────────────────────────

/// Construction parameters for a [`RenderEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub assets: AssetConfig,
    pub surface: SurfaceConfig,
    pub tiles: TileLayerConfig,
    /// Drawn by `draw(None)`.
    pub defaults: MapRenderConfig,
}

impl EngineOptions {
    pub fn with_defaults(mut self, defaults: MapRenderConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_surface(mut self, surface: SurfaceConfig) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_tiles(mut self, tiles: TileLayerConfig) -> Self {
        self.tiles = tiles;
        self
    }
}

// ── Engine ────────────────────────────────────────────────────────────

pub struct RenderEngine<B: MapBackend> {
    id: EngineId,
    backend: B,
    options: EngineOptions,
    load_state: AssetLoadState,
    load_attempts: u32,
    map: Option<MapHandle>,
    queue: CommandQueue,
    /// A viewport has been drawn or queued; used only for diagnostics.
    viewport_requested: bool,
}

impl<B: MapBackend> RenderEngine<B> {
    /// Create an engine and immediately start loading the tile library.
    pub fn new(backend: B, options: EngineOptions) -> Result<Self, RenderError> {
        let mut engine = Self {
            id: Uuid::new_v4(),
            backend,
            options,
            load_state: AssetLoadState::NotStarted,
            load_attempts: 0,
            map: None,
            queue: CommandQueue::new(),
            viewport_requested: false,
        };
        engine.begin_load()?;
        Ok(engine)
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn load_state(&self) -> AssetLoadState {
        self.load_state
    }

    pub fn load_attempts(&self) -> u32 {
        self.load_attempts
    }

    pub fn map_handle(&self) -> Option<MapHandle> {
        self.map
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    // ── Draw requests ────────────────────────────────────────────────

    /// Host entry point: `None` draws the configured defaults, `Some(raw)`
    /// decodes a wire-format string and renders it.
    ///
    /// A decode failure is returned before anything is queued or drawn.
    pub fn draw(&mut self, input: Option<&str>) -> Result<(), RenderError> {
        let config = match input {
            None => self.options.defaults.clone(),
            Some(raw) => codec::decode(raw)?,
        };
        self.render_from_config(config)
    }

    /// Create the map at `viewport`, or move the existing one there.
    /// Markers already placed stay on the map.
    pub fn draw_viewport(&mut self, viewport: ViewportSpec) -> Result<(), RenderError> {
        self.submit(DrawCommand::Viewport(viewport))
    }

    pub fn add_marker(&mut self, latitude: f64, longitude: f64) -> Result<(), RenderError> {
        self.submit(DrawCommand::Marker(MarkerSpec::new(latitude, longitude)))
    }

    /// Add markers in input order. Accepts either marker shape; an empty list
    /// does nothing.
    pub fn add_marker_list<I, M>(&mut self, markers: I) -> Result<(), RenderError>
    where
        I: IntoIterator<Item = M>,
        M: Into<MarkerSpec>,
    {
        let markers: Vec<MarkerSpec> = markers.into_iter().map(Into::into).collect();
        if markers.is_empty() {
            return Ok(());
        }
        self.submit(DrawCommand::MarkerList(markers))
    }

    /// Draw the viewport and then all markers of `config` as one unit.
    pub fn render_from_config(&mut self, config: MapRenderConfig) -> Result<(), RenderError> {
        self.submit(DrawCommand::Config(config))
    }

    fn submit(&mut self, command: DrawCommand) -> Result<(), RenderError> {
        if matches!(command, DrawCommand::Viewport(_) | DrawCommand::Config(_)) {
            self.viewport_requested = true;
        } else if command.places_markers() && !self.viewport_requested {
            log::warn!(
                "[{}] {} requested before any viewport",
                self.id,
                command.description()
            );
        }

        match self.load_state {
            AssetLoadState::Ready => self.execute(command),
            AssetLoadState::NotStarted | AssetLoadState::Loading => {
                self.queue.push(command);
                Ok(())
            }
            AssetLoadState::Failed => Err(RenderError::AssetsFailed),
        }
    }

    // ── Asset load signals ───────────────────────────────────────────

    /// The tile library finished loading. Replays queued commands in arrival
    /// order and returns how many ran.
    ///
    /// Every queued command runs even if an earlier one fails; the first
    /// failure is returned afterwards. Repeated signals are ignored.
    pub fn on_assets_loaded(&mut self) -> Result<usize, RenderError> {
        match self.load_state {
            AssetLoadState::Ready => {
                log::warn!("[{}] Duplicate load-completion signal ignored", self.id);
                return Ok(0);
            }
            AssetLoadState::Failed => return Err(RenderError::AssetsFailed),
            AssetLoadState::NotStarted | AssetLoadState::Loading => {}
        }

        self.load_state = AssetLoadState::Ready;
        let pending = self.queue.drain();
        log::info!(
            "[{}] Tile library ready; replaying {} queued command(s)",
            self.id,
            pending.len()
        );

        let count = pending.len();
        let mut first_error = None;
        for command in pending {
            let description = command.description().to_string();
            if let Err(e) = self.execute(command) {
                log::error!("[{}] {} failed: {}", self.id, description, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }

    /// The tile library failed to load. Retries while attempts remain;
    /// otherwise drops the queue and stops accepting draw requests.
    pub fn on_assets_failed(&mut self, reason: &str) -> Result<(), RenderError> {
        if self.load_state != AssetLoadState::Loading {
            log::warn!(
                "[{}] Load failure reported in state {:?}; ignored",
                self.id,
                self.load_state
            );
            return Ok(());
        }

        if self.load_attempts < self.options.assets.max_load_attempts {
            log::warn!(
                "[{}] Tile library load failed ({}); retrying, attempt {} of {}",
                self.id,
                reason,
                self.load_attempts + 1,
                self.options.assets.max_load_attempts
            );
            return self.begin_load();
        }

        self.load_state = AssetLoadState::Failed;
        let dropped = self.queue.discard();
        log::error!(
            "[{}] Tile library load failed after {} attempt(s): {}; dropped {} queued command(s)",
            self.id,
            self.load_attempts,
            reason,
            dropped
        );
        Err(RenderError::AssetLoadFailed {
            attempts: self.load_attempts,
            reason: reason.to_string(),
        })
    }

    fn begin_load(&mut self) -> Result<(), RenderError> {
        self.load_attempts += 1;
        self.load_state = AssetLoadState::Loading;
        log::info!(
            "[{}] Loading tile library from {} (attempt {})",
            self.id,
            self.options.assets.script_url,
            self.load_attempts
        );
        self.backend.load_assets(&self.options.assets)?;
        Ok(())
    }

    // ── Execution (Ready only) ───────────────────────────────────────

    fn execute(&mut self, command: DrawCommand) -> Result<(), RenderError> {
        log::debug!("[{}] Running: {}", self.id, command.description());
        match command {
            DrawCommand::Viewport(viewport) => self.apply_viewport(&viewport),
            DrawCommand::Marker(marker) => self.apply_marker(&marker),
            DrawCommand::MarkerList(markers) => {
                markers.iter().try_for_each(|m| self.apply_marker(m))
            }
            DrawCommand::Config(config) => {
                self.apply_viewport(&config.viewport)?;
                config.markers.iter().try_for_each(|m| self.apply_marker(m))
            }
        }
    }

    fn apply_viewport(&mut self, viewport: &ViewportSpec) -> Result<(), RenderError> {
        match self.map {
            Some(map) => {
                self.backend.set_view(map, viewport)?;
            }
            None => {
                if self.options.surface.create_element {
                    self.backend.create_surface(&self.options.surface)?;
                }
                let map = self
                    .backend
                    .create_map(&self.options.surface.element_id, viewport)?;
                self.backend.add_tile_layer(map, &self.options.tiles)?;
                self.map = Some(map);
                log::info!(
                    "[{}] Map created at ({}, {}) zoom {}",
                    self.id,
                    viewport.latitude,
                    viewport.longitude,
                    viewport.zoom_level
                );
            }
        }
        Ok(())
    }

    fn apply_marker(&mut self, marker: &MarkerSpec) -> Result<(), RenderError> {
        let map = self.map.ok_or(RenderError::MissingViewport)?;
        self.backend.add_marker(map, marker)?;
        Ok(())
    }
}
