//! Process-wide settings, built once at startup and passed by reference.

use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::core::Fps;
use crate::foundation::error::{VibeError, VibeResult};

/// Output container for the muxed video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// H.264 video + AAC audio.
    #[default]
    Mp4,
    /// VP9 video + Opus audio.
    Webm,
}

impl Container {
    /// File extension, also passed to ffmpeg as the output format.
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Webm => "webm",
        }
    }

    /// Parse `mp4` or `webm`, case-insensitively.
    pub fn parse(s: &str) -> VibeResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Container::Mp4),
            "webm" => Ok(Container::Webm),
            other => Err(VibeError::validation(format!(
                "unknown container '{other}' (expected mp4 or webm)"
            ))),
        }
    }
}

/// Text-generation provider settings.
#[derive(Clone, Debug)]
pub struct TextProviderConfig {
    /// `VIBEFRAME_TEXT_API_KEY`.
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// API base URL.
    pub endpoint: String,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
}

/// Speech synthesis provider settings.
#[derive(Clone, Debug)]
pub struct SpeechProviderConfig {
    /// `VIBEFRAME_SPEECH_API_KEY`; at least 10 characters.
    pub api_key: Option<String>,
    /// Voice used for every clip.
    pub voice_id: String,
    /// Speech model name.
    pub model: String,
    /// Text-to-speech base URL; the voice id is appended.
    pub endpoint: String,
}

/// Defaults for the export engine.
#[derive(Clone, Debug)]
pub struct ExportDefaults {
    /// Frame rate.
    pub fps: Fps,
    /// Output container.
    pub container: Container,
    /// TTF/OTF used for on-screen text. When unset, a few common system paths are tried.
    pub font_path: Option<PathBuf>,
    /// Target video bitrate in bits per second (MP4 only).
    pub video_bitrate: u32,
    /// Directory exported files are written to.
    pub output_dir: PathBuf,
}

/// Settings for the pipeline providers and the export engine.
#[derive(Clone, Debug)]
pub struct Config {
    /// Text-generation provider.
    pub text: TextProviderConfig,
    /// Speech synthesis provider.
    pub speech: SpeechProviderConfig,
    /// Export defaults, overridable per run.
    pub export: ExportDefaults,
    /// Timeout applied to every outbound HTTP request (asset fetch and providers).
    pub http_timeout: Duration,
}

/// Default text model.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
/// Default text API base URL.
pub const DEFAULT_TEXT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default text-to-speech base URL.
pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://api.elevenlabs.io/v1/text-to-speech";
/// Default speech model.
pub const DEFAULT_SPEECH_MODEL: &str = "eleven_multilingual_v2";
/// Default voice.
pub const DEFAULT_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";
/// Retries after the first attempt of each agent call.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// 8 Mbit/s.
pub const DEFAULT_VIDEO_BITRATE: u32 = 8_000_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            text: TextProviderConfig {
                api_key: None,
                model: DEFAULT_TEXT_MODEL.to_string(),
                endpoint: DEFAULT_TEXT_ENDPOINT.to_string(),
                max_retries: DEFAULT_MAX_RETRIES,
            },
            speech: SpeechProviderConfig {
                api_key: None,
                voice_id: DEFAULT_VOICE_ID.to_string(),
                model: DEFAULT_SPEECH_MODEL.to_string(),
                endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            },
            export: ExportDefaults {
                fps: Fps::thirty(),
                container: Container::Mp4,
                font_path: None,
                video_bitrate: DEFAULT_VIDEO_BITRATE,
                output_dir: PathBuf::from("."),
            },
            http_timeout: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read `VIBEFRAME_*` variables over the defaults.
    pub fn from_env() -> VibeResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> VibeResult<Self> {
        let mut cfg = Self::default();
        let get = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        cfg.text.api_key = get("VIBEFRAME_TEXT_API_KEY").or_else(|| get("API_KEY"));
        if let Some(v) = get("VIBEFRAME_TEXT_MODEL") {
            cfg.text.model = v;
        }
        if let Some(v) = get("VIBEFRAME_TEXT_ENDPOINT") {
            cfg.text.endpoint = v;
        }
        if let Some(v) = get("VIBEFRAME_MAX_RETRIES") {
            cfg.text.max_retries = parse_num("VIBEFRAME_MAX_RETRIES", &v)?;
        }

        cfg.speech.api_key = get("VIBEFRAME_SPEECH_API_KEY");
        if let Some(v) = get("VIBEFRAME_VOICE_ID") {
            cfg.speech.voice_id = v;
        }
        if let Some(v) = get("VIBEFRAME_SPEECH_MODEL") {
            cfg.speech.model = v;
        }
        if let Some(v) = get("VIBEFRAME_SPEECH_ENDPOINT") {
            cfg.speech.endpoint = v;
        }

        if let Some(v) = get("VIBEFRAME_FPS") {
            cfg.export.fps = Fps::new(parse_num("VIBEFRAME_FPS", &v)?, 1)?;
        }
        if let Some(v) = get("VIBEFRAME_CONTAINER") {
            cfg.export.container = Container::parse(&v)?;
        }
        cfg.export.font_path = get("VIBEFRAME_FONT").map(PathBuf::from);
        if let Some(v) = get("VIBEFRAME_VIDEO_BITRATE") {
            cfg.export.video_bitrate = parse_num("VIBEFRAME_VIDEO_BITRATE", &v)?;
        }
        if let Some(v) = get("VIBEFRAME_OUTPUT_DIR") {
            cfg.export.output_dir = PathBuf::from(v);
        }
        if let Some(v) = get("VIBEFRAME_HTTP_TIMEOUT_SECS") {
            cfg.http_timeout = Duration::from_secs(parse_num("VIBEFRAME_HTTP_TIMEOUT_SECS", &v)?);
        }
        Ok(cfg)
    }

    /// Blocking HTTP client honoring the configured timeout.
    pub fn http_client(&self) -> VibeResult<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| VibeError::provider(format!("failed to build http client: {e}")))
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, v: &str) -> VibeResult<T> {
    v.trim()
        .parse::<T>()
        .map_err(|_| VibeError::validation(format!("{key} must be a number, got '{v}'")))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
