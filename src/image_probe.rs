//! # Image Probing
//!
//! Reads the intrinsic pixel size of `<img>` sources without decoding pixel
//! data, so images without explicit `width`/`height` attributes can still be
//! measured. Supports data URIs and local file paths; anything else (remote
//! URLs, unknown formats) yields `None` and the measurer falls back to a
//! fixed aspect ratio.

use std::io::Cursor;

/// Intrinsic (width, height) in pixels, if the source can be read.
pub fn image_dimensions(src: &str) -> Option<(u32, u32)> {
    let bytes = match read_source_bytes(src) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("image size unknown for '{}': {}", truncate(src, 48), e);
            return None;
        }
    };
    match dimensions_from_bytes(&bytes) {
        Ok(dims) => Some(dims),
        Err(e) => {
            log::debug!("image size unknown for '{}': {}", truncate(src, 48), e);
            None
        }
    }
}

/// Resolve the source string to raw image bytes.
fn read_source_bytes(src: &str) -> Result<Vec<u8>, String> {
    // data:image/png;base64,iVBOR...
    if src.starts_with("data:image/") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| "Invalid data URI: missing comma".to_string())?;
        if !src[..comma_pos].ends_with(";base64") {
            return Err("Only base64 data URIs are supported".to_string());
        }
        return base64_decode(&src[comma_pos + 1..]);
    }

    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        #[cfg(not(target_arch = "wasm32"))]
        {
            return std::fs::read(src)
                .map_err(|e| format!("Failed to read image file '{}': {}", src, e));
        }
        #[cfg(target_arch = "wasm32")]
        {
            return Err(format!("File path images not readable in WASM: '{}'", src));
        }
    }

    Err("Not a data URI or local path".to_string())
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("Base64 decode error: {}", e))
}

/// Read dimensions from the image header.
fn dimensions_from_bytes(data: &[u8]) -> Result<(u32, u32), String> {
    if data.len() < 4 {
        return Err("Image data too short".to_string());
    }
    image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Format detection error: {}", e))?
        .into_dimensions()
        .map_err(|e| format!("Failed to read dimensions: {}", e))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
