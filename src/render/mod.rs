//! CPU frame rendering with `vello_cpu`, text shaping with `parley`.

/// Frame buffer type.
pub mod backend;
/// Per-frame compositing.
pub mod frame;
pub mod layout;
/// Text shaping, wrapping and reveal helpers.
pub mod text;

pub use backend::FrameRGBA;
pub use frame::FrameRenderer;
pub use text::{TextBrushRgba8, TextLayoutEngine};
