use std::path::{Path, PathBuf};

use crate::config::Container;
use crate::foundation::error::{VibeError, VibeResult};

/// Finished export on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Final file path.
    pub path: PathBuf,
    /// Container written.
    pub container: Container,
    /// Video frames encoded.
    pub frames: u64,
    /// Timeline length.
    pub duration_ms: u64,
}

/// Collapse every run of non-alphanumeric characters in `topic` to a single `_`.
pub fn sanitize_topic(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len());
    let mut in_run = false;
    for c in topic.chars() {
        if c.is_alphanumeric() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// `vibeframe_export_<topic>.<ext>`.
pub fn export_filename(topic: &str, container: Container) -> String {
    format!(
        "vibeframe_export_{}.{}",
        sanitize_topic(topic),
        container.extension()
    )
}

/// In-progress output written next to its final path with a `.part` suffix.
///
/// Dropping without [`PartFile::commit`] removes the partial file.
#[derive(Debug)]
pub struct PartFile {
    part: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl PartFile {
    /// Guard for `target`; the partial file is `<target>.part`.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        let target = target.into();
        let mut name = target.file_name().unwrap_or_default().to_os_string();
        name.push(".part");
        Self {
            part: target.with_file_name(name),
            target,
            committed: false,
        }
    }

    /// Path to write to while the run is in progress.
    pub fn part_path(&self) -> &Path {
        &self.part
    }

    /// Final path after commit.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Move the partial file into place.
    pub fn commit(mut self) -> VibeResult<PathBuf> {
        std::fs::rename(&self.part, &self.target).map_err(|e| {
            VibeError::encode(format!(
                "failed to move '{}' to '{}': {e}",
                self.part.display(),
                self.target.display()
            ))
        })?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.part);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/artifact.rs"]
mod tests;
