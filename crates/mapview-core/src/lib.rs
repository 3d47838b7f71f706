//! # MapView Core
//!
//! Map configuration model and the terse wire-format codec.
//!
//! A host hands the widget a single string such as
//! `[[45.0,-93.0,10],[45.1,-93.1],[],[45.2,-93.2]]`. This crate turns it into a
//! [`MapRenderConfig`] and back into the compact object form that is embedded
//! in generated markup.

pub mod geo;
pub mod codec;

pub use geo::{MapRenderConfig, MarkerShape, MarkerSpec, ViewportSpec};
pub use codec::{decode, encode, CodecError};
