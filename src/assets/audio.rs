use std::io::{Read, Write};
use std::process::{Command, Stdio};

use crate::foundation::error::{VibeError, VibeResult};

/// Sample rate of every decoded clip and of the mixed track.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Interleaved `f32` PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Samples, `channels` per frame.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames.
    pub fn frame_count(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Clip length in milliseconds, rounded up so visuals never end before the audio does.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frame_count() * 1000).div_ceil(u64::from(self.sample_rate))
    }

    /// `true` when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.interleaved_f32.is_empty()
    }
}

/// Decode an encoded audio payload (mp3, wav, ogg, ...) to stereo `f32` at `sample_rate`.
///
/// The bytes are streamed to `ffmpeg` on stdin from a writer thread while stdout is drained on
/// the calling thread, so large clips cannot deadlock on full pipes.
pub fn decode_audio_f32_stereo(bytes: &[u8], sample_rate: u32) -> VibeResult<AudioPcm> {
    if bytes.is_empty() {
        return Err(VibeError::asset("audio payload is empty"));
    }

    let mut child = Command::new("ffmpeg")
        .args(["-hide_banner", "-v", "error", "-i", "pipe:0"])
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| VibeError::asset(format!("failed to run ffmpeg for audio decode: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| VibeError::asset("ffmpeg stdin not available"))?;
    let input = bytes.to_vec();
    let writer = std::thread::spawn(move || {
        // ffmpeg may stop reading early on malformed input; the exit status reports that.
        let _ = stdin.write_all(&input);
    });

    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| VibeError::asset("ffmpeg stderr not available"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf);
        buf
    });

    let mut raw = Vec::new();
    if let Some(mut stdout) = child.stdout.take() {
        stdout
            .read_to_end(&mut raw)
            .map_err(|e| VibeError::asset(format!("read ffmpeg audio output: {e}")))?;
    }

    let _ = writer.join();
    let status = child
        .wait()
        .map_err(|e| VibeError::asset(format!("wait for ffmpeg: {e}")))?;
    let stderr = stderr_drain.join().unwrap_or_default();

    if !status.success() {
        let msg = String::from_utf8_lossy(&stderr);
        return Err(VibeError::asset(format!(
            "ffmpeg audio decode failed: {}",
            msg.trim()
        )));
    }

    pcm_from_f32le(&raw, sample_rate)
}

pub(crate) fn pcm_from_f32le(raw: &[u8], sample_rate: u32) -> VibeResult<AudioPcm> {
    if !raw.len().is_multiple_of(4) {
        return Err(VibeError::asset(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let interleaved_f32 = raw
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/audio.rs"]
mod tests;
