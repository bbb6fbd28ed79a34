//! Narration and music mixing into one track for the muxer.

/// Per-run placement of audio sources.
pub mod manifest;
/// Sample mixing and f32le output.
pub mod mix;

pub use manifest::{AudioManifest, AudioSource, build_audio_manifest};
pub use mix::{frame_to_sample, mix_manifest, write_mix_to_f32le_file};
