use std::path::Path;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{VibeError, VibeResult};
use crate::model::{MediaLocation, MediaRef};

/// Raw payload of a media reference plus whatever content type could be inferred.
#[derive(Clone, Debug)]
pub struct ResolvedBytes {
    /// Payload.
    pub bytes: Vec<u8>,
    /// Content type from the data URL, HTTP header or file extension.
    pub mime: Option<String>,
}

/// Fetch the bytes behind `media`.
///
/// `data:` payloads are base64-decoded in place, `http(s)` URLs go through `client`, and
/// anything else is read from disk.
pub fn resolve_bytes(
    media: &MediaRef,
    client: &reqwest::blocking::Client,
) -> VibeResult<ResolvedBytes> {
    if media.is_empty() {
        return Err(VibeError::asset("empty media reference"));
    }
    match media.location() {
        MediaLocation::Embedded { mime, base64 } => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(base64.trim())
                .map_err(|e| VibeError::asset(format!("invalid base64 payload ({mime}): {e}")))?;
            Ok(ResolvedBytes {
                bytes,
                mime: Some(mime.to_string()).filter(|m| !m.is_empty()),
            })
        }
        MediaLocation::Remote(url) => {
            let resp = client
                .get(url)
                .send()
                .map_err(|e| VibeError::asset(format!("fetch '{url}': {e}")))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(VibeError::asset(format!("fetch '{url}': http {status}")));
            }
            let mime = resp
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
            let bytes = resp
                .bytes()
                .map_err(|e| VibeError::asset(format!("read body of '{url}': {e}")))?;
            Ok(ResolvedBytes {
                bytes: bytes.to_vec(),
                mime,
            })
        }
        MediaLocation::File(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read media file '{}'", path.display()))
                .map_err(|e| VibeError::asset(format!("{e:#}")))?;
            Ok(ResolvedBytes {
                mime: mime_from_extension(&path).map(str::to_string),
                bytes,
            })
        }
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        _ => return None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
