//! Time-driven visual effects applied by the frame renderer.

/// Crossfade and Ken Burns zoom.
pub mod transitions;

pub use transitions::{CROSSFADE_MS, Crossfade, KEN_BURNS_MAX_ZOOM, crossfade_at, ken_burns};
