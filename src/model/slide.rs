use crate::model::media::MediaRef;

/// Nominal speaking rate used to estimate narration length before audio exists.
pub const ESTIMATED_WORDS_PER_MINUTE: u64 = 150;

/// Duration assigned to an explainer slide when speech synthesis fails.
pub const DEFAULT_SLIDE_DURATION_MS: u64 = 5000;

/// Visual treatment routing tag chosen by the generation pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageBranch {
    /// Photographic/cinematic imagery; text inside the image is allowed.
    #[default]
    Nature,
    /// Diagrams and schematics; strictly no text inside the image.
    Technical,
}

/// Label/formula pair intended to be overlaid on a technical image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TechnicalOverlay {
    /// Caption for the overlay.
    pub label: String,
    /// Optional formula rendered next to the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

/// Spoken text plus its synthesized audio and measured duration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Narration {
    /// Text to speak.
    pub text: String,
    /// Synthesized speech for `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaRef>,
    /// Measured length of `audio`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Narration {
    /// Narration without audio yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio: None,
            duration_ms: None,
        }
    }

    /// Replace the text and drop audio derived from the old text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.audio = None;
        self.duration_ms = None;
    }
}

/// One bullet of a presentation slide.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Short on-screen label.
    pub visual_text: String,
    /// Narration for this bullet.
    pub spoken_text: String,
    /// Synthesized speech for `spoken_text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaRef>,
    /// Measured length of `audio`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Point {
    /// Point without audio yet.
    pub fn new(visual_text: impl Into<String>, spoken_text: impl Into<String>) -> Self {
        Self {
            visual_text: visual_text.into(),
            spoken_text: spoken_text.into(),
            audio: None,
            duration_ms: None,
        }
    }
}

/// Mode-specific slide content, selected by an explicit `kind` discriminant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideContent {
    /// Narrated body text revealed progressively.
    Explainer {
        /// Narration, also shown on screen.
        text: String,
        /// Speech for `text`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<MediaRef>,
    },
    /// Heading, spoken intro, then one segment per point.
    Presentation {
        /// Always-visible title.
        heading: String,
        /// Spoken before the first point.
        #[serde(default)]
        intro: Narration,
        /// Bullets in reveal order.
        #[serde(default)]
        points: Vec<Point>,
    },
}

/// One visual unit of the video: background image plus mode-specific content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slide {
    /// Stable id, unique within the project.
    pub id: String,
    /// Prompt the background image is generated from.
    pub visual_prompt: String,
    /// Background image; required for export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaRef>,
    /// Total slide duration; for presentation slides this is intro + all points.
    #[serde(default)]
    pub duration_ms: u64,
    /// Image treatment picked by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_branch: Option<ImageBranch>,
    /// Labels meant for technical diagrams.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technical_overlays: Vec<TechnicalOverlay>,
    /// Mode-specific text and narration.
    pub content: SlideContent,
}

impl Slide {
    /// Explainer slide with no media yet.
    pub fn explainer(
        id: impl Into<String>,
        text: impl Into<String>,
        visual_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            visual_prompt: visual_prompt.into(),
            image: None,
            duration_ms: 0,
            image_branch: None,
            technical_overlays: Vec::new(),
            content: SlideContent::Explainer {
                text: text.into(),
                audio: None,
            },
        }
    }

    /// Presentation slide with no media yet.
    pub fn presentation(
        id: impl Into<String>,
        heading: impl Into<String>,
        intro: impl Into<String>,
        points: Vec<Point>,
        visual_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            visual_prompt: visual_prompt.into(),
            image: None,
            duration_ms: 0,
            image_branch: None,
            technical_overlays: Vec::new(),
            content: SlideContent::Presentation {
                heading: heading.into(),
                intro: Narration::new(intro),
                points,
            },
        }
    }

    /// `true` for [`SlideContent::Presentation`].
    pub fn is_presentation(&self) -> bool {
        matches!(self.content, SlideContent::Presentation { .. })
    }

    /// Number of timeline segments this slide contributes (pads excluded).
    pub fn segment_count(&self) -> usize {
        match &self.content {
            SlideContent::Explainer { .. } => 1,
            SlideContent::Presentation { points, .. } => 1 + points.len(),
        }
    }

    /// Replace narration text of an explainer slide, invalidating its audio and duration.
    pub fn set_text(&mut self, new_text: impl Into<String>) {
        if let SlideContent::Explainer { text, audio } = &mut self.content {
            *text = new_text.into();
            *audio = None;
            self.duration_ms = 0;
        }
    }

    /// Replace the heading of a presentation slide, invalidating narration audio.
    pub fn set_heading(&mut self, new_heading: impl Into<String>) {
        if let SlideContent::Presentation { heading, intro, .. } = &mut self.content {
            *heading = new_heading.into();
            intro.audio = None;
            intro.duration_ms = None;
            self.duration_ms = 0;
        }
    }

    /// Replace the intro narration of a presentation slide.
    pub fn set_intro_text(&mut self, new_text: impl Into<String>) {
        if let SlideContent::Presentation { intro, .. } = &mut self.content {
            intro.set_text(new_text);
            self.duration_ms = 0;
        }
    }

    /// Replace both texts of point `idx`, dropping its audio when the spoken text changed.
    pub fn set_point_text(
        &mut self,
        idx: usize,
        visual_text: impl Into<String>,
        spoken_text: impl Into<String>,
    ) {
        let SlideContent::Presentation { points, .. } = &mut self.content else {
            return;
        };
        let Some(p) = points.get_mut(idx) else {
            return;
        };
        let spoken_text = spoken_text.into();
        p.visual_text = visual_text.into();
        if p.spoken_text != spoken_text {
            p.spoken_text = spoken_text;
            p.audio = None;
            p.duration_ms = None;
            self.duration_ms = 0;
        }
    }

    /// Replace the image prompt, dropping the rendered image.
    pub fn set_visual_prompt(&mut self, prompt: impl Into<String>) {
        self.visual_prompt = prompt.into();
        self.image = None;
    }

    /// Recompute `duration_ms` of a presentation slide from its intro and points.
    pub fn recompute_duration(&mut self) {
        if let SlideContent::Presentation { intro, points, .. } = &self.content {
            let points_ms: u64 = points.iter().filter_map(|p| p.duration_ms).sum();
            self.duration_ms = intro.duration_ms.unwrap_or(0) + points_ms;
        }
    }
}

/// Estimate how long `text` takes to speak at [`ESTIMATED_WORDS_PER_MINUTE`].
pub fn estimate_speech_ms(text: &str) -> u64 {
    let words = text.split_whitespace().count() as u64;
    words * 60_000 / ESTIMATED_WORDS_PER_MINUTE
}

#[cfg(test)]
#[path = "../../tests/unit/model/slide.rs"]
mod tests;
