use std::sync::Arc;

use crate::assets::{AudioPcm, MIX_SAMPLE_RATE};
use crate::audio::mix::frame_to_sample;
use crate::foundation::core::Fps;
use crate::timeline::Timeline;

/// One scheduled contribution in output sample space.
#[derive(Clone, Debug)]
pub struct AudioSource {
    /// First output sample frame.
    pub timeline_start_sample: u64,
    /// Exclusive end; looping sources repeat until here.
    pub timeline_end_sample: u64,
    /// Linear gain.
    pub volume: f32,
    /// Restart the clip until `timeline_end_sample`.
    pub looping: bool,
    /// Decoded clip at the manifest's rate.
    pub pcm: Arc<AudioPcm>,
}

/// Audio rendering plan for a whole export run.
#[derive(Clone, Debug)]
pub struct AudioManifest {
    /// Output sample rate.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output length in sample frames.
    pub total_samples: u64,
    /// Everything to sum, in placement order.
    pub sources: Vec<AudioSource>,
}

impl AudioManifest {
    /// `true` when nothing is scheduled.
    pub fn is_silent(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Place each segment's narration at its first frame and, when given, loop `music` under the
/// whole run at `music_volume`.
///
/// A narration clip is scheduled for its full length even if that runs past its segment.
pub fn build_audio_manifest(
    timeline: &Timeline,
    fps: Fps,
    music: Option<Arc<AudioPcm>>,
    music_volume: f32,
) -> AudioManifest {
    let sample_rate = MIX_SAMPLE_RATE;
    let video_frames = timeline.total_frames(fps);
    let mut total_samples = frame_to_sample(video_frames, fps, sample_rate);

    let mut sources = Vec::new();
    for (seg, (start_frame, _)) in timeline.segments().iter().zip(timeline.frame_spans(fps)) {
        let Some(pcm) = seg.audio.clone() else {
            continue;
        };
        if pcm.is_empty() || pcm.sample_rate == 0 {
            continue;
        }
        let start = frame_to_sample(start_frame, fps, sample_rate);
        let len = resampled_len(&pcm, sample_rate);
        let end = start + len;
        total_samples = total_samples.max(end);
        sources.push(AudioSource {
            timeline_start_sample: start,
            timeline_end_sample: end,
            volume: 1.0,
            looping: false,
            pcm,
        });
    }

    if let Some(pcm) = music.filter(|m| !m.is_empty() && m.sample_rate > 0)
        && music_volume > 0.0
    {
        sources.push(AudioSource {
            timeline_start_sample: 0,
            timeline_end_sample: total_samples,
            volume: music_volume,
            looping: true,
            pcm,
        });
    }

    AudioManifest {
        sample_rate,
        channels: 2,
        total_samples,
        sources,
    }
}

fn resampled_len(pcm: &AudioPcm, out_rate: u32) -> u64 {
    let num = u128::from(pcm.frame_count()) * u128::from(out_rate);
    num.div_ceil(u128::from(pcm.sample_rate)) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/manifest.rs"]
mod tests;
