//! Expansion of a project into the ordered segments the export loop plays.

/// Segment types and timeline construction.
pub mod segment;

pub use segment::{
    END_PAD_MS, NARRATION_FLOOR_MS, START_PAD_MS, Segment, SegmentKind, Timeline, build_timeline,
};
