use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::foundation::error::{VibeError, VibeResult};
use crate::foundation::math::clamp01;

/// Maximum number of explainer lines kept on screen; older lines scroll off the top.
pub const MAX_VISIBLE_LINES: usize = 4;

/// Blink period of the reveal caret.
pub const CARET_BLINK_MS: f64 = 1000.0;

// Used for width estimates when no font could be loaded.
const FALLBACK_ADVANCE_EM: f32 = 0.55;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl TextBrushRgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Brush from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Shapes and measures on-screen text with a single registered face.
///
/// Without a face the engine still answers width queries from a fixed per-character advance,
/// so wrapping stays deterministic; glyphs are simply not drawn.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    font: Option<LoadedFont>,
    widths: HashMap<(u32, String), f32>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Engine with no face registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            font: None,
            widths: HashMap::new(),
        }
    }

    /// Engine that shapes everything with the face in `font_bytes`.
    pub fn with_font_bytes(font_bytes: Vec<u8>) -> VibeResult<Self> {
        let mut engine = Self::new();
        let families = engine
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| VibeError::render("no font families registered from font bytes"))?;
        let family = engine
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| VibeError::render("registered font family has no name"))?
            .to_string();

        engine.font = Some(LoadedFont {
            family,
            data: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font_bytes),
                0,
            ),
        });
        Ok(engine)
    }

    /// Engine using `preferred` when readable, otherwise the first available system face.
    pub fn discover(preferred: Option<&Path>) -> Self {
        let Some((path, bytes)) = find_font(preferred) else {
            warn!("no usable font found; on-screen text will not be drawn");
            return Self::new();
        };
        match Self::with_font_bytes(bytes) {
            Ok(engine) => {
                debug!(
                    font = %path.display(),
                    family = engine.family_name().unwrap_or(""),
                    "font loaded"
                );
                engine
            }
            Err(e) => {
                warn!(font = %path.display(), error = %e, "font could not be registered");
                Self::new()
            }
        }
    }

    /// `true` when a face is registered and glyphs will be drawn.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Family name of the registered face.
    pub fn family_name(&self) -> Option<&str> {
        self.font.as_ref().map(|f| f.family.as_str())
    }

    /// Face data for glyph drawing.
    pub fn font_data(&self) -> Option<&vello_cpu::peniko::FontData> {
        self.font.as_ref().map(|f| &f.data)
    }

    /// Shape `text` on a single line. Returns `None` when no face is registered.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> VibeResult<Option<parley::Layout<TextBrushRgba8>>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(VibeError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(font) = self.font.as_ref() else {
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(Some(layout))
    }

    /// Advance width of `text` at `size_px`. Results are cached per string and size.
    pub fn measure(&mut self, text: &str, size_px: f32) -> f32 {
        let key = (size_px.to_bits(), text.to_string());
        if let Some(w) = self.widths.get(&key) {
            return *w;
        }
        let width = match self.layout_line(text, size_px, TextBrushRgba8::WHITE) {
            Ok(Some(layout)) => layout.width(),
            _ => fallback_width(text, size_px),
        };
        self.widths.insert(key, width);
        width
    }
}

fn fallback_width(text: &str, size_px: f32) -> f32 {
    text.chars().count() as f32 * size_px * FALLBACK_ADVANCE_EM
}

fn find_font(preferred: Option<&Path>) -> Option<(PathBuf, Vec<u8>)> {
    if let Some(p) = preferred {
        match std::fs::read(p) {
            Ok(bytes) => return Some((p.to_path_buf(), bytes)),
            Err(e) => warn!(font = %p.display(), error = %e, "configured font unreadable"),
        }
    }
    FONT_CANDIDATES.iter().find_map(|c| {
        let p = PathBuf::from(c);
        std::fs::read(&p).ok().map(|bytes| (p, bytes))
    })
}

/// Number of characters shown at reveal progress `p`: `floor(chars * p)`.
pub fn visible_char_count(text: &str, p: f64) -> usize {
    let total = text.chars().count();
    ((total as f64) * clamp01(p)).floor() as usize
}

/// Prefix of `text` revealed at progress `p`, cut on a character boundary.
pub fn revealed_prefix(text: &str, p: f64) -> &str {
    let n = visible_char_count(text, p);
    match text.char_indices().nth(n) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Greedy word wrap: words are added to the current line while `measure(line)` fits in
/// `max_width`. A word is never split; one wider than `max_width` gets a line to itself.
pub fn wrap_words(
    text: &str,
    max_width: f32,
    mut measure: impl FnMut(&str) -> f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// The trailing `max` lines.
pub fn last_lines(lines: &[String], max: usize) -> &[String] {
    &lines[lines.len().saturating_sub(max)..]
}

/// Caret visibility `elapsed_ms` into a segment (on for the first half of each period).
pub fn caret_visible(elapsed_ms: f64) -> bool {
    elapsed_ms.max(0.0) % CARET_BLINK_MS < CARET_BLINK_MS / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
