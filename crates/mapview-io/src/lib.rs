//! # MapView I/O
//!
//! Host-facing side of the map widget: turns a wire-format string into an
//! HTML document for a web view, and reads/writes the JSON settings file
//! that holds the externally configurable URLs and defaults.

pub mod markup;
pub mod settings;

pub use markup::{inline_page, loader_page, MarkupError};
pub use settings::{MapViewSettings, SettingsError};
