use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{VibeError, VibeResult};
use crate::render::backend::FrameRGBA;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Mixed soundtrack, when the run has any audio.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM audio input for sinks that encode audio.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate of the PCM file.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

/// Consumer of rendered frames.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order between one `begin` and one
/// `end`. `abort` is called instead of `end` when the run fails or is cancelled.
pub trait FrameSink: Send {
    /// Prepare for frames described by `cfg`.
    fn begin(&mut self, cfg: SinkConfig) -> VibeResult<()>;
    /// Consume frame `idx` (premultiplied RGBA8).
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VibeResult<()>;
    /// Finalize the output.
    fn end(&mut self) -> VibeResult<()>;
    /// Tear down without finalizing. The default does nothing.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    audio: Option<Vec<u8>>,
    finished: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames in timeline order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Raw `f32le` soundtrack bytes copied at `begin`.
    pub fn audio_bytes(&self) -> Option<&[u8]> {
        self.audio.as_deref()
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> VibeResult<()> {
        self.audio = match cfg.audio.as_ref() {
            Some(a) => Some(std::fs::read(&a.path).map_err(|e| {
                VibeError::encode(format!("read audio input '{}': {e}", a.path.display()))
            })?),
            None => None,
        };
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VibeResult<()> {
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(VibeError::encode("in-memory sink received out-of-order frame"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> VibeResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
