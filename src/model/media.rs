use std::fmt;
use std::path::PathBuf;

/// Reference to an image or audio payload.
///
/// Serialized as a plain string. The variant is derived from the string's shape: `http(s)://`
/// URLs, `data:` URLs with an embedded base64 payload, or anything else as a local file path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

/// Where a [`MediaRef`] points, borrowed from the reference string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaLocation<'a> {
    /// `http://` or `https://` URL.
    Remote(&'a str),
    /// `data:` URL.
    Embedded {
        /// Declared media type.
        mime: &'a str,
        /// Undecoded payload.
        base64: &'a str,
    },
    /// Local path, with any `file://` prefix removed.
    File(PathBuf),
}

impl MediaRef {
    /// Wrap a reference string as-is.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Raw reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build an embedded `data:` reference from raw bytes.
    pub fn embed(mime: &str, bytes: &[u8]) -> Self {
        use base64::Engine as _;
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime};base64,{payload}"))
    }

    /// Classify the reference by its prefix.
    pub fn location(&self) -> MediaLocation<'_> {
        let s = self.0.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            return MediaLocation::Remote(s);
        }
        if let Some(rest) = s.strip_prefix("data:") {
            let (header, payload) = rest.split_once(',').unwrap_or((rest, ""));
            let mime = header.strip_suffix(";base64").unwrap_or(header);
            return MediaLocation::Embedded {
                mime,
                base64: payload,
            };
        }
        let path = s.strip_prefix("file://").unwrap_or(s);
        MediaLocation::File(PathBuf::from(path))
    }

    /// `true` for a blank reference.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Short form for logs; embedded payloads are not printed.
    pub fn display_short(&self) -> String {
        match self.location() {
            MediaLocation::Remote(url) => url.to_string(),
            MediaLocation::Embedded { mime, base64 } => {
                format!("data:{mime} ({} base64 bytes)", base64.len())
            }
            MediaLocation::File(p) => p.display().to_string(),
        }
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_short())
    }
}

impl From<&str> for MediaRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MediaRef {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/media.rs"]
mod tests;
