//! Export driver: one run from a project to a finished video file.

/// Output naming and the `.part` file guard.
pub mod artifact;
/// The export run itself.
pub mod engine;

pub use artifact::{ExportArtifact, PartFile, export_filename, sanitize_topic};
pub use engine::{ExportOptions, ExportStats, Exporter, export_video};
