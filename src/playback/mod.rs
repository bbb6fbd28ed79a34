//! Per-segment frame clock and run cancellation.

/// Frame clock and cancellation token.
pub mod clock;

pub use clock::{CancelToken, ClockState, Pacing, SegmentClock, Tick};
