//! Terse wire format <-> [`MapRenderConfig`].
//!
//! ## Input
//! A JSON array `[[lat, long, zoom], [lat, long] | [], ...]`. Element 0 is the
//! viewport; every later element is a marker or an empty placeholder.
//!
//! ## Output
//! A compact object `{"position":{"lat":..,"long":..,"zoom":..},"markers":[[lat,long],..]}`
//! with no whitespace. [`decode`] accepts this form as well, so a config
//! survives `decode(encode(..))` unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::geo::{MapRenderConfig, MarkerShape, MarkerSpec, ViewportSpec};

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed map input: {0}")]
    MalformedInput(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    fn malformed(message: impl Into<String>) -> Self {
        CodecError::MalformedInput(message.into())
    }
}

// ── Compact object form ───────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct Position {
    lat: f64,
    long: f64,
    zoom: f64,
}

#[derive(Debug, Serialize)]
struct EncodedConfig {
    position: Position,
    markers: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct StructuredConfig {
    position: Position,
    #[serde(default)]
    markers: Vec<MarkerShape>,
}

// ── Decoding ──────────────────────────────────────────────────────────

/// Decode a terse array (or the compact object produced by [`encode`]).
///
/// Integer and float literals are both read as `f64`. Any violation aborts
/// the whole decode; no partial config is returned.
pub fn decode(raw: &str) -> Result<MapRenderConfig, CodecError> {
    let root: Value = serde_json::from_str(raw)?;
    match root {
        Value::Array(elements) => decode_terse(&elements),
        Value::Object(_) => decode_structured(root),
        other => Err(CodecError::malformed(format!(
            "expected a JSON array, found {}",
            value_kind(&other)
        ))),
    }
}

fn decode_terse(elements: &[Value]) -> Result<MapRenderConfig, CodecError> {
    let (head, rest) = elements
        .split_first()
        .ok_or_else(|| CodecError::malformed("missing viewport element"))?;

    let viewport = decode_viewport(head)?;

    let mut markers = Vec::with_capacity(rest.len());
    for (offset, element) in rest.iter().enumerate() {
        let index = offset + 1;
        if is_placeholder(element) {
            log::debug!("Skipping empty marker placeholder at element {}", index);
            continue;
        }
        markers.push(decode_marker(element, index)?);
    }

    Ok(MapRenderConfig { viewport, markers })
}

fn decode_viewport(value: &Value) -> Result<ViewportSpec, CodecError> {
    let numbers = numeric_entries(value, 0)?;
    if numbers.len() < 3 {
        return Err(CodecError::malformed(format!(
            "viewport needs [lat, long, zoom], got {} entries",
            numbers.len()
        )));
    }
    if numbers.len() > 3 {
        log::warn!(
            "Viewport element has {} entries; ignoring all but the first three",
            numbers.len()
        );
    }
    Ok(ViewportSpec::new(numbers[0], numbers[1], numbers[2]))
}

fn decode_marker(value: &Value, index: usize) -> Result<MarkerSpec, CodecError> {
    let numbers = numeric_entries(value, index)?;
    match numbers.as_slice() {
        [lat, long] => Ok(MarkerSpec::new(*lat, *long)),
        _ => Err(CodecError::malformed(format!(
            "marker at element {} needs [lat, long], got {} entries",
            index,
            numbers.len()
        ))),
    }
}

fn numeric_entries(value: &Value, index: usize) -> Result<Vec<f64>, CodecError> {
    let entries = value.as_array().ok_or_else(|| {
        CodecError::malformed(format!(
            "element {} must be an array, found {}",
            index,
            value_kind(value)
        ))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            entry.as_f64().ok_or_else(|| {
                CodecError::malformed(format!(
                    "element {} entry {} is not a number ({})",
                    index,
                    position,
                    value_kind(entry)
                ))
            })
        })
        .collect()
}

fn is_placeholder(value: &Value) -> bool {
    matches!(value, Value::Array(entries) if entries.is_empty())
}

fn decode_structured(root: Value) -> Result<MapRenderConfig, CodecError> {
    let structured: StructuredConfig = serde_json::from_value(root)
        .map_err(|e| CodecError::malformed(format!("invalid map object: {}", e)))?;

    let Position { lat, long, zoom } = structured.position;
    Ok(MapRenderConfig {
        viewport: ViewportSpec::new(lat, long, zoom),
        markers: structured
            .markers
            .into_iter()
            .map(MarkerShape::normalize)
            .collect(),
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Encoding ──────────────────────────────────────────────────────────

/// Encode a config as the compact object form.
///
/// The result is safe to paste between single quotes inside a `<script>`
/// block. Non-finite coordinates are rejected since JSON cannot carry them.
pub fn encode(config: &MapRenderConfig) -> Result<String, CodecError> {
    if !config.viewport.is_finite() {
        return Err(CodecError::malformed("viewport has a non-finite value"));
    }
    if let Some(index) = config.markers.iter().position(|m| !m.is_finite()) {
        return Err(CodecError::malformed(format!(
            "marker {} has a non-finite value",
            index
        )));
    }

    let encoded = EncodedConfig {
        position: Position {
            lat: config.viewport.latitude,
            long: config.viewport.longitude,
            zoom: config.viewport.zoom_level,
        },
        markers: config.markers.iter().map(MarkerSpec::to_pair).collect(),
    };

    let json = serde_json::to_string(&encoded)?;
    Ok(escape_for_script_literal(&json))
}

/// Replace characters that could end a single-quoted script literal or the
/// enclosing `<script>` element with their JSON `\uXXXX` escapes.
///
/// Only valid on JSON text: those characters can appear there solely inside
/// string values, where the escape is equivalent.
pub fn escape_for_script_literal(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '\'' => out.push_str("\\u0027"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}
