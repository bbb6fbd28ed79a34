//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order; the export engine drives them.

/// `ffmpeg`-based sink (MP4 or WebM via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
