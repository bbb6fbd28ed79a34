//! Project data model produced by the generation pipeline and read by the export engine.

/// Media references.
pub mod media;
/// The project aggregate and its settings.
pub mod project;
/// Slides, narration units and duration helpers.
pub mod slide;

pub use media::{MediaLocation, MediaRef};
pub use project::{
    AspectRatio, ImageSize, Language, Project, ProjectMode, VisualStyle, clamp_music_volume,
};
pub use slide::{
    ImageBranch, Narration, Point, Slide, SlideContent, TechnicalOverlay, estimate_speech_ms,
};
