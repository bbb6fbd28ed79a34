use std::sync::Arc;

use crate::assets::{AudioPcm, LoadedAssets};
use crate::foundation::core::Fps;
use crate::foundation::error::{VibeError, VibeResult};
use crate::foundation::math::clamp01;
use crate::model::slide::DEFAULT_SLIDE_DURATION_MS;
use crate::model::{Project, SlideContent, estimate_speech_ms};

/// Silent lead-in showing the first slide before any narration.
pub const START_PAD_MS: u64 = 1000;
/// Silent tail holding the fully revealed last slide.
pub const END_PAD_MS: u64 = 2000;
/// Minimum length of an intro or point without audio.
pub const NARRATION_FLOOR_MS: u64 = 3000;

/// What a segment shows and narrates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Silent lead-in on the first slide.
    StartPad,
    /// Presentation heading with its spoken intro.
    SlideIntro,
    /// One presentation point, emphasized.
    SlidePoint,
    /// Explainer body text with progressive reveal.
    SlideBody,
    /// Silent tail on the fully revealed last slide.
    EndPad,
}

/// One contiguous, individually clocked span of the output.
#[derive(Clone, Debug)]
pub struct Segment {
    /// Segment kind.
    pub kind: SegmentKind,
    /// Slide whose visuals this segment shows.
    pub slide: usize,
    /// Point index for [`SegmentKind::SlidePoint`].
    pub point: Option<usize>,
    /// Narration played from the segment's first frame.
    pub audio: Option<Arc<AudioPcm>>,
    /// Resolved length; never shorter than `audio`.
    pub duration_ms: u64,
    /// Previous slide to fade out of; set on the first segment of every slide after the first.
    pub crossfade_from: Option<usize>,
    /// Offset of this segment inside its slide.
    pub slide_offset_ms: u64,
    /// Sum of all segment durations of the slide.
    pub slide_total_ms: u64,
}

impl Segment {
    fn pad(kind: SegmentKind, slide: usize, duration_ms: u64) -> Self {
        Self {
            kind,
            slide,
            point: None,
            audio: None,
            duration_ms,
            crossfade_from: None,
            slide_offset_ms: 0,
            slide_total_ms: duration_ms,
        }
    }

    /// Progress through the whole slide at `elapsed_ms` into this segment.
    ///
    /// Pinned to 0 on the start pad and 1 on the end pad so the zoom neither jumps into the
    /// first slide nor out of the last one.
    pub fn slide_progress(&self, elapsed_ms: f64) -> f64 {
        match self.kind {
            SegmentKind::StartPad => 0.0,
            SegmentKind::EndPad => 1.0,
            _ if self.slide_total_ms == 0 => 1.0,
            _ => clamp01((self.slide_offset_ms as f64 + elapsed_ms) / self.slide_total_ms as f64),
        }
    }

    /// `true` for the start and end pads.
    pub fn is_pad(&self) -> bool {
        matches!(self.kind, SegmentKind::StartPad | SegmentKind::EndPad)
    }
}

/// Ordered segments of one export run.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    /// Segments in playback order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` when there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment durations.
    pub fn total_ms(&self) -> u64 {
        self.segments.iter().map(|s| s.duration_ms).sum()
    }

    /// `(start_frame, frame_count)` for every segment at `fps`.
    ///
    /// Each segment is clocked independently, so start frames are the running sum of the
    /// per-segment frame counts rather than a rounding of the millisecond offsets.
    pub fn frame_spans(&self, fps: Fps) -> Vec<(u64, u64)> {
        let mut start = 0u64;
        self.segments
            .iter()
            .map(|s| {
                let count = fps.ms_to_frames_ceil(s.duration_ms);
                let span = (start, count);
                start += count;
                span
            })
            .collect()
    }

    /// Frames the export loop will render at `fps`.
    pub fn total_frames(&self, fps: Fps) -> u64 {
        self.frame_spans(fps).iter().map(|(_, n)| n).sum()
    }
}

/// Expand `project` into StartPad, per-slide segments and EndPad.
///
/// Segment length is the decoded narration length when audio resolved, otherwise the largest of
/// the stored duration, a speaking-rate estimate and a per-kind floor.
pub fn build_timeline(project: &Project, assets: &LoadedAssets) -> VibeResult<Timeline> {
    if project.slides.is_empty() {
        return Err(VibeError::validation("cannot build a timeline with no slides"));
    }
    if assets.slides.len() != project.slides.len() {
        return Err(VibeError::validation(format!(
            "asset count {} does not match slide count {}",
            assets.slides.len(),
            project.slides.len()
        )));
    }

    let mut segments = vec![Segment::pad(SegmentKind::StartPad, 0, START_PAD_MS)];

    for (i, (slide, loaded)) in project.slides.iter().zip(&assets.slides).enumerate() {
        let first = segments.len();
        match &slide.content {
            SlideContent::Explainer { text, .. } => {
                let audio = loaded.body_audio.clone();
                let duration_ms = resolve_duration(
                    audio.as_deref(),
                    slide.duration_ms,
                    text,
                    DEFAULT_SLIDE_DURATION_MS,
                );
                segments.push(slide_segment(SegmentKind::SlideBody, i, None, audio, duration_ms));
            }
            SlideContent::Presentation { intro, points, .. } => {
                let audio = loaded.intro_audio.clone();
                let duration_ms = resolve_duration(
                    audio.as_deref(),
                    intro.duration_ms.unwrap_or(0),
                    &intro.text,
                    NARRATION_FLOOR_MS,
                );
                segments.push(slide_segment(SegmentKind::SlideIntro, i, None, audio, duration_ms));

                for (p, point) in points.iter().enumerate() {
                    let audio = loaded.point_audio.get(p).cloned().flatten();
                    let duration_ms = resolve_duration(
                        audio.as_deref(),
                        point.duration_ms.unwrap_or(0),
                        &point.spoken_text,
                        NARRATION_FLOOR_MS,
                    );
                    segments.push(slide_segment(
                        SegmentKind::SlidePoint,
                        i,
                        Some(p),
                        audio,
                        duration_ms,
                    ));
                }
            }
        }

        let slide_segments = &mut segments[first..];
        let total: u64 = slide_segments.iter().map(|s| s.duration_ms).sum();
        let mut offset = 0;
        for s in slide_segments.iter_mut() {
            s.slide_offset_ms = offset;
            s.slide_total_ms = total;
            offset += s.duration_ms;
        }
        if i > 0 {
            slide_segments[0].crossfade_from = Some(i - 1);
        }
    }

    let last = project.slides.len() - 1;
    segments.push(Segment::pad(SegmentKind::EndPad, last, END_PAD_MS));

    Ok(Timeline { segments })
}

fn slide_segment(
    kind: SegmentKind,
    slide: usize,
    point: Option<usize>,
    audio: Option<Arc<AudioPcm>>,
    duration_ms: u64,
) -> Segment {
    Segment {
        kind,
        slide,
        point,
        audio,
        duration_ms,
        crossfade_from: None,
        slide_offset_ms: 0,
        slide_total_ms: 0,
    }
}

pub(crate) fn resolve_duration(
    audio: Option<&AudioPcm>,
    stored_ms: u64,
    text: &str,
    floor_ms: u64,
) -> u64 {
    match audio {
        Some(pcm) if pcm.duration_ms() > 0 => pcm.duration_ms(),
        _ => stored_ms.max(estimate_speech_ms(text)).max(floor_ms),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/segment.rs"]
mod tests;
