//! Media resolution and decoding.
//!
//! Every image, narration clip, music bed and logo a project references is resolved to bytes and
//! decoded here, before the first frame is drawn.

/// Audio decoding to PCM.
pub mod audio;
/// Image decoding.
pub mod decode;
/// Whole-project asset loading.
pub mod loader;
/// Reference to bytes resolution.
pub mod source;

pub use audio::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
pub use decode::{PreparedImage, decode_image};
pub use loader::{AssetLoader, LoadedAssets, SlideAssets};
pub use source::{ResolvedBytes, resolve_bytes};
