use tracing::{info, warn};

use crate::assets::audio::{MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::config::Config;
use crate::foundation::error::{VibeError, VibeResult};
use crate::model::slide::DEFAULT_SLIDE_DURATION_MS;
use crate::model::{AspectRatio, ImageSize, Language, MediaRef, Project, SlideContent, VisualStyle};

/// Stand-in image used when generation fails for a slide.
pub const IMAGE_FAILED_URL: &str = "https://placehold.co/1280x720/222/white?text=Image+Failed";

/// Produces a background image reference for a visual prompt.
pub trait ImageGenerator: Send + Sync {
    /// Image for `prompt`, rendered at `size` and `aspect` in `style`.
    fn generate(
        &self,
        prompt: &str,
        size: ImageSize,
        aspect: AspectRatio,
        style: VisualStyle,
    ) -> VibeResult<MediaRef>;
}

/// Synthesized narration and its measured length.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesizedSpeech {
    /// Encoded speech.
    pub audio: MediaRef,
    /// `None` when the length could not be measured.
    pub duration_ms: Option<u64>,
}

/// Turns narration text into speech audio.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` in `language`.
    fn synthesize(&self, text: &str, language: Language) -> VibeResult<SynthesizedSpeech>;
}

/// Image generator that always answers with a static placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderImages;

impl ImageGenerator for PlaceholderImages {
    fn generate(
        &self,
        _prompt: &str,
        _size: ImageSize,
        aspect: AspectRatio,
        _style: VisualStyle,
    ) -> VibeResult<MediaRef> {
        let dims = match aspect {
            AspectRatio::Landscape => "1280x720",
            AspectRatio::Portrait => "720x1280",
        };
        Ok(MediaRef::new(format!(
            "https://placehold.co/{dims}/22c55e/FFF?text=System+Online"
        )))
    }
}

/// ElevenLabs text-to-speech client. Audio is returned embedded as an `audio/mpeg` data URL and
/// its length is measured by decoding it through `ffmpeg`.
pub struct ElevenLabsSpeech {
    client: reqwest::blocking::Client,
    endpoint: String,
    voice_id: String,
    model: String,
    api_key: String,
}

#[derive(Debug, serde::Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    language_code: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, serde::Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsSpeech {
    /// Build from the speech section of `config`. Fails when no API key is configured.
    pub fn from_config(config: &Config) -> VibeResult<Self> {
        let api_key = config
            .speech
            .api_key
            .clone()
            .filter(|k| k.trim().len() >= 10)
            .ok_or_else(|| {
                VibeError::validation(
                    "speech provider api key is missing or too short (VIBEFRAME_SPEECH_API_KEY)",
                )
            })?;
        Ok(Self {
            client: config.http_client()?,
            endpoint: config.speech.endpoint.clone(),
            voice_id: config.speech.voice_id.clone(),
            model: config.speech.model.clone(),
            api_key: api_key.trim().to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.voice_id)
    }
}

impl SpeechSynthesizer for ElevenLabsSpeech {
    fn synthesize(&self, text: &str, language: Language) -> VibeResult<SynthesizedSpeech> {
        let locale = language.locale();
        let body = SpeechRequest {
            text,
            model_id: &self.model,
            language_code: locale.split('-').next().unwrap_or(locale),
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
            },
        };
        let response = self
            .client
            .post(self.url())
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VibeError::provider(format!(
                "speech synthesis failed ({status}): {body}"
            )));
        }
        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(VibeError::provider("speech synthesis returned no audio"));
        }

        let duration_ms = match decode_audio_f32_stereo(&bytes, MIX_SAMPLE_RATE) {
            Ok(pcm) => Some(pcm.duration_ms()),
            Err(e) => {
                warn!(error = %e, "could not measure synthesized speech");
                None
            }
        };
        Ok(SynthesizedSpeech {
            audio: MediaRef::embed("audio/mpeg", &bytes),
            duration_ms,
        })
    }
}

/// Fills missing images, narration audio and durations of a generated project.
///
/// Existing media is kept. Failures never abort: images fall back to [`IMAGE_FAILED_URL`],
/// an explainer slide whose speech fails gets the default duration, and presentation narration
/// that fails is left without audio.
pub struct MediaFiller<'a> {
    images: &'a dyn ImageGenerator,
    speech: Option<&'a dyn SpeechSynthesizer>,
    language: Language,
}

impl<'a> MediaFiller<'a> {
    /// Filler drawing images from `images` and, when given, narration from `speech`.
    pub fn new(
        images: &'a dyn ImageGenerator,
        speech: Option<&'a dyn SpeechSynthesizer>,
        language: Language,
    ) -> Self {
        Self {
            images,
            speech,
            language,
        }
    }

    /// Give every slide an image and, with a synthesizer, narration audio for each spoken text.
    #[tracing::instrument(skip_all, fields(slides = project.slides.len()))]
    pub fn fill(&self, project: &mut Project, on_progress: &mut dyn FnMut(&str)) {
        let total = project.slides.len();
        let (size, aspect, style) = (
            project.image_size,
            project.aspect_ratio,
            project.visual_style,
        );

        for (i, slide) in project.slides.iter_mut().enumerate() {
            on_progress(&format!("Processing slide {} of {total}...", i + 1));

            if slide.image.is_none() {
                let image = self
                    .images
                    .generate(&slide.visual_prompt, size, aspect, style)
                    .unwrap_or_else(|e| {
                        warn!(slide = i + 1, error = %e, "image generation failed");
                        MediaRef::new(IMAGE_FAILED_URL)
                    });
                slide.image = Some(image);
            }

            match &mut slide.content {
                SlideContent::Explainer { text, audio } => {
                    if audio.is_none() && !text.trim().is_empty() {
                        match self.speak(text) {
                            Ok(speech) => {
                                *audio = Some(speech.audio);
                                slide.duration_ms =
                                    speech.duration_ms.unwrap_or(DEFAULT_SLIDE_DURATION_MS);
                            }
                            Err(e) => {
                                warn!(slide = i + 1, error = %e, "narration failed");
                                slide.duration_ms = DEFAULT_SLIDE_DURATION_MS;
                            }
                        }
                    }
                }
                SlideContent::Presentation { intro, points, .. } => {
                    if intro.audio.is_none() && !intro.text.trim().is_empty() {
                        match self.speak(&intro.text) {
                            Ok(speech) => {
                                intro.audio = Some(speech.audio);
                                intro.duration_ms = speech.duration_ms;
                            }
                            Err(e) => warn!(slide = i + 1, error = %e, "intro narration failed"),
                        }
                    }
                    for (p, point) in points.iter_mut().enumerate() {
                        if point.audio.is_some() || point.spoken_text.trim().is_empty() {
                            continue;
                        }
                        match self.speak(&point.spoken_text) {
                            Ok(speech) => {
                                point.audio = Some(speech.audio);
                                point.duration_ms = speech.duration_ms;
                            }
                            Err(e) => warn!(
                                slide = i + 1,
                                point = p + 1,
                                error = %e,
                                "point narration failed"
                            ),
                        }
                    }
                    slide.recompute_duration();
                }
            }
        }
        info!("media filled");
        on_progress("");
    }

    fn speak(&self, text: &str) -> VibeResult<SynthesizedSpeech> {
        let speech = self
            .speech
            .ok_or_else(|| VibeError::provider("no speech synthesizer configured"))?;
        speech.synthesize(text, self.language)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/media.rs"]
mod tests;
