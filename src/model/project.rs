use crate::foundation::core::Canvas;
use crate::foundation::error::{VibeError, VibeResult};
use crate::model::media::MediaRef;
use crate::model::slide::Slide;

/// Upper bound for background music gain.
pub const MAX_MUSIC_VOLUME: f32 = 0.5;
/// Background music gain used when a project does not set one.
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.15;

/// Slide layout family of a whole project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectMode {
    /// One narrated text block per slide.
    Explainer,
    /// Headline plus sequentially revealed bullet points.
    Presentation,
}

/// Requested resolution of generated images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageSize {
    /// About 1024 px on the long side.
    #[default]
    #[serde(rename = "1K")]
    Size1K,
    /// About 4096 px on the long side.
    #[serde(rename = "4K")]
    Size4K,
}

/// Output orientation; also selects the render canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    /// 16:9.
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16.
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// Render canvas for this orientation.
    pub fn canvas(self) -> Canvas {
        match self {
            AspectRatio::Landscape => Canvas::LANDSCAPE,
            AspectRatio::Portrait => Canvas::PORTRAIT,
        }
    }

    /// Ratio label, e.g. `16:9`.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

/// Art direction forwarded to image prompts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VisualStyle {
    /// Film-like lighting and framing.
    #[default]
    Cinematic,
    /// Photographic.
    Realistic,
    /// Cartoon or 3D animation look.
    Animated,
    /// Flat, sparse compositions.
    Minimalist,
    /// Glowing neon palette.
    Neon,
    /// Vintage look.
    Retro,
    /// Painterly fantasy art.
    Fantasy,
    /// High-tech dystopian look.
    Cyberpunk,
}

impl VisualStyle {
    /// Name used inside prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            VisualStyle::Cinematic => "Cinematic",
            VisualStyle::Realistic => "Realistic",
            VisualStyle::Animated => "Animated",
            VisualStyle::Minimalist => "Minimalist",
            VisualStyle::Neon => "Neon",
            VisualStyle::Retro => "Retro",
            VisualStyle::Fantasy => "Fantasy",
            VisualStyle::Cyberpunk => "Cyberpunk",
        }
    }
}

/// Narration language used by the generation pipeline and speech synthesis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Language {
    /// `LV`.
    #[default]
    #[serde(rename = "LV")]
    Latvian,
    /// `EN`.
    #[serde(rename = "EN")]
    English,
    /// `RU`.
    #[serde(rename = "RU")]
    Russian,
    /// `DE`.
    #[serde(rename = "DE")]
    German,
    /// `FR`.
    #[serde(rename = "FR")]
    French,
    /// `ES`.
    #[serde(rename = "ES")]
    Spanish,
}

impl Language {
    /// English language name used in prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::Latvian => "Latvian",
            Language::English => "English",
            Language::Russian => "Russian",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
        }
    }

    /// BCP 47 locale tag.
    pub fn locale(self) -> &'static str {
        match self {
            Language::Latvian => "lv-LV",
            Language::English => "en-US",
            Language::Russian => "ru-RU",
            Language::German => "de-DE",
            Language::French => "fr-FR",
            Language::Spanish => "es-ES",
        }
    }
}

/// Aggregate root: everything the export engine needs to assemble one video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    /// Random v4 id assigned at creation.
    pub id: uuid::Uuid,
    /// User-provided topic; also names the exported file.
    pub topic: String,
    /// Every slide must match this mode.
    pub mode: ProjectMode,
    /// Playback/export order.
    pub slides: Vec<Slide>,
    /// Resolution requested for generated images.
    #[serde(default)]
    pub image_size: ImageSize,
    /// Output orientation.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Art direction for image prompts.
    #[serde(default)]
    pub visual_style: VisualStyle,
    /// Creation time (UTC).
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Music bed looped under the whole video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_music: Option<MediaRef>,
    /// Music gain in `[0, 0.5]`.
    #[serde(default = "default_music_volume")]
    pub music_volume: f32,
    /// Logo drawn in the top-right corner of every frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<MediaRef>,
}

fn default_music_volume() -> f32 {
    DEFAULT_MUSIC_VOLUME
}

impl Project {
    /// New project with default settings, a fresh id and the current time.
    pub fn new(topic: impl Into<String>, mode: ProjectMode, slides: Vec<Slide>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            topic: topic.into(),
            mode,
            slides,
            image_size: ImageSize::default(),
            aspect_ratio: AspectRatio::default(),
            visual_style: VisualStyle::default(),
            created_at: chrono::Utc::now(),
            background_music: None,
            music_volume: DEFAULT_MUSIC_VOLUME,
            logo: None,
        }
    }

    /// Render canvas for the project's aspect ratio.
    pub fn canvas(&self) -> Canvas {
        self.aspect_ratio.canvas()
    }

    /// Music gain clamped to `[0, MAX_MUSIC_VOLUME]`.
    pub fn clamped_music_volume(&self) -> f32 {
        clamp_music_volume(self.music_volume)
    }

    /// Check the invariants the export engine relies on.
    pub fn validate(&self) -> VibeResult<()> {
        if self.slides.is_empty() {
            return Err(VibeError::validation("project has no slides"));
        }
        for (i, s) in self.slides.iter().enumerate() {
            let expected = self.mode == ProjectMode::Presentation;
            if s.is_presentation() != expected {
                return Err(VibeError::validation(format!(
                    "slide {} ('{}') does not match project mode {:?}",
                    i + 1,
                    s.id,
                    self.mode
                )));
            }
        }
        Ok(())
    }
}

/// Clamp a music gain to `[0, MAX_MUSIC_VOLUME]`; non-finite input gets the default.
pub fn clamp_music_volume(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, MAX_MUSIC_VOLUME)
    } else {
        DEFAULT_MUSIC_VOLUME
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/project.rs"]
mod tests;
