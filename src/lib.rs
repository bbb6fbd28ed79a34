//! vibeframe assembles short narrated videos from a topic.
//!
//! Two halves:
//!
//! - The generation pipeline ([`pipeline`]) plans slides through a text model and fills
//!   images and narration audio, producing a [`Project`].
//! - The export engine ([`export`]) resolves every asset, expands the project into a timeline
//!   of segments, mixes one soundtrack, renders each frame on the CPU and streams the frames
//!   into a [`FrameSink`] (usually `ffmpeg`).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Asset resolution and decoding.
pub mod assets;
/// Soundtrack planning and mixing.
pub mod audio;
pub mod config;
/// Background transitions.
pub mod effects;
/// Encoding sinks.
pub mod encode;
pub mod export;
pub mod model;
pub mod pipeline;
/// Per-segment frame clock and cancellation.
pub mod playback;
/// Frame drawing.
pub mod render;
pub mod timeline;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{VibeError, VibeResult};

pub use crate::config::{Config, Container};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::export::{ExportArtifact, ExportOptions, ExportStats, Exporter, export_video};
pub use crate::model::{Project, ProjectMode, Slide, SlideContent};
pub use crate::playback::{CancelToken, Pacing};
pub use crate::render::backend::FrameRGBA;
