use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::assets::audio::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::source::resolve_bytes;
use crate::foundation::error::{VibeError, VibeResult};
use crate::model::{MediaRef, Project, Slide, SlideContent};

/// Decoded media for one slide. Audio entries are `None` when the reference was absent or
/// failed to load.
#[derive(Clone, Debug)]
pub struct SlideAssets {
    /// Background image.
    pub image: PreparedImage,
    /// Explainer narration.
    pub body_audio: Option<Arc<AudioPcm>>,
    /// Presentation intro narration.
    pub intro_audio: Option<Arc<AudioPcm>>,
    /// One entry per presentation point, in point order.
    pub point_audio: Vec<Option<Arc<AudioPcm>>>,
}

/// Everything a run needs, resolved before the first frame.
#[derive(Clone, Debug)]
pub struct LoadedAssets {
    /// Parallel to `Project::slides`.
    pub slides: Vec<SlideAssets>,
    /// Background music bed.
    pub music: Option<Arc<AudioPcm>>,
    /// Corner logo.
    pub logo: Option<PreparedImage>,
}

/// Resolves and decodes project media with a per-loader dedupe cache.
pub struct AssetLoader {
    client: reqwest::blocking::Client,
    sample_rate: u32,
    images: Mutex<HashMap<u64, PreparedImage>>,
    audio: Mutex<HashMap<u64, Arc<AudioPcm>>>,
}

impl AssetLoader {
    /// Loader fetching remote media through `client`.
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self {
            client,
            sample_rate: MIX_SAMPLE_RATE,
            images: Mutex::new(HashMap::new()),
            audio: Mutex::new(HashMap::new()),
        }
    }

    /// Load every slide image, narration clip, the music bed and the logo.
    ///
    /// A missing or undecodable slide image fails the whole load. Audio and logo failures are
    /// logged and yield `None`.
    #[tracing::instrument(skip_all, fields(slides = project.slides.len()))]
    pub fn load(
        &self,
        project: &Project,
        music: Option<&MediaRef>,
        logo: Option<&MediaRef>,
    ) -> VibeResult<LoadedAssets> {
        let slides = project
            .slides
            .par_iter()
            .enumerate()
            .map(|(i, slide)| self.load_slide(i, slide))
            .collect::<VibeResult<Vec<_>>>()?;

        let (music, logo) = rayon::join(
            || music.and_then(|m| self.audio_or_warn(m, "background music")),
            || logo.and_then(|l| self.logo_or_warn(l)),
        );

        info!(
            slides = slides.len(),
            music = music.is_some(),
            logo = logo.is_some(),
            "assets loaded"
        );
        Ok(LoadedAssets {
            slides,
            music,
            logo,
        })
    }

    fn load_slide(&self, index: usize, slide: &Slide) -> VibeResult<SlideAssets> {
        let image_ref = slide.image.as_ref().filter(|m| !m.is_empty()).ok_or_else(|| {
            VibeError::asset(format!(
                "slide {} ('{}') has no image",
                index + 1,
                slide.id
            ))
        })?;
        let image = self.image(image_ref).map_err(|e| {
            VibeError::asset(format!(
                "slide {} ('{}') image {}: {e}",
                index + 1,
                slide.id,
                image_ref
            ))
        })?;

        let mut assets = SlideAssets {
            image,
            body_audio: None,
            intro_audio: None,
            point_audio: Vec::new(),
        };
        match &slide.content {
            SlideContent::Explainer { audio, .. } => {
                assets.body_audio = audio
                    .as_ref()
                    .and_then(|a| self.audio_or_warn(a, "narration"));
            }
            SlideContent::Presentation { intro, points, .. } => {
                assets.intro_audio = intro
                    .audio
                    .as_ref()
                    .and_then(|a| self.audio_or_warn(a, "intro narration"));
                assets.point_audio = points
                    .par_iter()
                    .map(|p| {
                        p.audio
                            .as_ref()
                            .and_then(|a| self.audio_or_warn(a, "point narration"))
                    })
                    .collect();
            }
        }
        Ok(assets)
    }

    /// Decode an image, reusing an earlier decode of the same reference.
    pub fn image(&self, media: &MediaRef) -> VibeResult<PreparedImage> {
        let key = cache_key(media);
        if let Some(hit) = lock(&self.images).get(&key) {
            debug!(media = %media, "image cache hit");
            return Ok(hit.clone());
        }
        let resolved = resolve_bytes(media, &self.client)?;
        let img = decode_image(&resolved.bytes, resolved.mime.as_deref())?;
        lock(&self.images).insert(key, img.clone());
        Ok(img)
    }

    /// Decode an audio clip, reusing an earlier decode of the same reference.
    pub fn audio(&self, media: &MediaRef) -> VibeResult<Arc<AudioPcm>> {
        let key = cache_key(media);
        if let Some(hit) = lock(&self.audio).get(&key) {
            debug!(media = %media, "audio cache hit");
            return Ok(hit.clone());
        }
        let resolved = resolve_bytes(media, &self.client)?;
        let pcm = Arc::new(decode_audio_f32_stereo(&resolved.bytes, self.sample_rate)?);
        lock(&self.audio).insert(key, pcm.clone());
        Ok(pcm)
    }

    fn audio_or_warn(&self, media: &MediaRef, what: &str) -> Option<Arc<AudioPcm>> {
        if media.is_empty() {
            return None;
        }
        match self.audio(media) {
            Ok(pcm) if !pcm.is_empty() => Some(pcm),
            Ok(_) => {
                warn!(media = %media, "{what} decoded to silence, skipping");
                None
            }
            Err(e) => {
                warn!(media = %media, error = %e, "{what} failed to load, skipping");
                None
            }
        }
    }

    fn logo_or_warn(&self, media: &MediaRef) -> Option<PreparedImage> {
        if media.is_empty() {
            return None;
        }
        self.image(media)
            .map_err(|e| warn!(media = %media, error = %e, "logo failed to load, skipping"))
            .ok()
    }
}

fn cache_key(media: &MediaRef) -> u64 {
    xxhash_rust::xxh3::xxh3_64(media.as_str().trim().as_bytes())
}

// A poisoned cache only means another loader thread panicked; the map itself is still valid.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
