//! # MapView Renderer
//!
//! Deferred render engine for the map widget.
//!
//! Drawing against the tile library is only valid once its script and
//! stylesheet have loaded, but hosts issue draw requests eagerly. The
//! [`RenderEngine`] starts the load on construction, captures early requests
//! in a FIFO queue and replays them exactly once when the load completes.
//! The library itself sits behind the [`MapBackend`] trait.

pub mod assets;
pub mod backend;
pub mod commands;
pub mod engine;
pub mod leaflet;
pub mod surface;

pub use assets::{AssetConfig, AssetLoadState};
pub use backend::{BackendCall, BackendError, MapBackend, MapHandle, RecordingBackend};
pub use commands::{CommandQueue, DrawCommand};
pub use engine::{EngineId, EngineOptions, RenderEngine, RenderError};
pub use leaflet::LeafletScript;
pub use surface::{SurfaceConfig, TileLayerConfig};
