//! `ImageInputResolver`: turns a dynamic `Value` into one or more
//! `ImagePayload`s — byte acquisition, format detection, and size
//! resolution.

use crate::error::ImageError;
use crate::inspector::{intrinsic_size, sniff, ImageFormat};
use crate::payload::ImagePayload;
use crate::size::{resolve_size, SizeRequest};
use base64::Engine as _;
use dxt_types::Value;
use std::path::Path;
use std::sync::OnceLock;

/// Resolves `value` into a list of payloads: `Array` → one payload per
/// element (nulls dropped), `Null` → empty, anything else → a single
/// payload.
pub fn resolve_many(value: &Value) -> Result<Vec<ImagePayload>, ImageError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(resolve_one)
            .collect(),
        other => resolve_one(other).map(|p| vec![p]),
    }
}

/// Resolves a single `Value` (string `src`, or an object carrying `src`/
/// `data`/`base64`/`path`/`value` plus size fields) into one `ImagePayload`.
pub fn resolve_one(value: &Value) -> Result<ImagePayload, ImageError> {
    let (src, request, mime_hint) = match value {
        Value::String(s) => (s.clone(), SizeRequest::default(), None),
        Value::Object(obj) => {
            let src = first_present(obj, &["src", "data", "base64", "path", "value"])
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .ok_or_else(|| ImageError::InvalidImageSource("missing src/data/base64/path/value".to_string()))?;
            let request = SizeRequest {
                width: int_field(obj, &["width", "widthPx"]),
                height: int_field(obj, &["height", "heightPx"]),
                max_width: int_field(obj, &["maxWidth"]),
                max_height: int_field(obj, &["maxHeight"]),
                scale: float_field(obj, &["scale"]),
                preserve_aspect_ratio: bool_field(obj, &["preserveAspectRatio", "keepAspectRatio", "lockAspectRatio"]),
            };
            let mime_hint = first_present(obj, &["mime", "mimeType", "contentType"])
                .and_then(|v| v.as_str().map(|s| s.to_string()));
            (src, request, mime_hint)
        }
        other => {
            return Err(ImageError::InvalidImageSource(format!(
                "unsupported image value shape: {other}"
            )))
        }
    };

    let (bytes, ext_hint) = acquire_bytes(&src)?;
    let format = detect_format(mime_hint.as_deref(), &bytes, ext_hint.as_deref())
        .ok_or(ImageError::UnknownImageFormat)?;
    let intrinsic = intrinsic_size(format, &bytes);
    let (width_px, height_px) = resolve_size(&request, intrinsic)?;

    Ok(ImagePayload {
        bytes,
        mime: format.mime(),
        width_px,
        height_px,
    })
}

fn first_present<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .filter(|v| !v.is_null())
}

fn int_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<u32> {
    first_present(obj, keys).and_then(|v| v.as_u64()).map(|v| v as u32)
}

fn float_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<f64> {
    first_present(obj, keys).and_then(|v| v.as_f64())
}

fn bool_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<bool> {
    first_present(obj, keys).and_then(|v| v.as_bool())
}

fn data_uri_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^data:([^;,]*)(;base64)?,(.*)$").expect("static regex is valid")
    })
}

/// Acquires raw bytes, trying in order: data URI, existing file, raw
/// base64. Returns the bytes and, when known, an extension hint
/// (from the data URI's MIME or the file's extension) for format detection.
fn acquire_bytes(src: &str) -> Result<(Vec<u8>, Option<String>), ImageError> {
    if let Some(caps) = data_uri_re().captures(src) {
        let mime = caps.get(1).map(|m| m.as_str().to_string());
        let is_base64 = caps.get(2).is_some();
        let payload = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        if !is_base64 {
            return Err(ImageError::InvalidImageSource(
                "non-base64 data URIs are not supported".to_string(),
            ));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| ImageError::InvalidImageSource("malformed base64 data URI".to_string()))?;
        return Ok((bytes, mime));
    }

    let path = Path::new(src);
    if path.is_file() {
        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::InvalidImageSource(format!("reading '{src}': {e}")))?;
        let ext = path.extension().and_then(|e| e.to_str()).map(|s| s.to_string());
        return Ok((bytes, ext));
    }

    let stripped: String = src.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&stripped)
        .map_err(|_| ImageError::InvalidImageSource(src.to_string()))?;
    Ok((bytes, None))
}

/// Format detection, trying in order: MIME hint, magic-byte sniff, file
/// extension.
fn detect_format(mime_hint: Option<&str>, bytes: &[u8], ext_hint: Option<&str>) -> Option<ImageFormat> {
    mime_hint
        .and_then(ImageFormat::from_hint)
        .or_else(|| sniff(bytes))
        .or_else(|| ext_hint.and_then(ImageFormat::from_hint))
}
