use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::foundation::core::Fps;
use crate::foundation::math::clamp01;

/// Lifecycle of a [`SegmentClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    /// Created, no tick taken yet.
    Idle,
    /// At least one tick taken, more remain.
    Running,
    /// The final tick (progress 1) has been taken.
    Complete,
}

/// How ticks relate to wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Emit ticks as fast as the consumer pulls them.
    #[default]
    Offline,
    /// Hold each tick until its wall-clock time since the segment started.
    RealTime,
}

/// One drawn frame of a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// 0-based frame within the segment.
    pub frame: u64,
    /// Time since the segment started, `frame / fps`.
    pub elapsed_ms: f64,
    /// `elapsed / duration` in `[0, 1]`; exactly 1 on the final tick.
    pub progress: f64,
    /// `true` on the tick that completes the segment.
    pub is_last: bool,
}

/// Frame-driven clock for one segment: `ceil(duration * fps)` ticks, then complete.
#[derive(Debug)]
pub struct SegmentClock {
    fps: Fps,
    duration_ms: u64,
    frame_count: u64,
    next: u64,
    state: ClockState,
    pacing: Pacing,
    started_at: Option<Instant>,
}

impl SegmentClock {
    /// Idle clock for a segment of `duration_ms`.
    pub fn new(duration_ms: u64, fps: Fps, pacing: Pacing) -> Self {
        Self {
            fps,
            duration_ms,
            frame_count: fps.ms_to_frames_ceil(duration_ms),
            next: 0,
            state: ClockState::Idle,
            pacing,
            started_at: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Ticks this clock will yield.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Segment length the clock was built for.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Idle -> Running. Has no effect once started.
    pub fn start(&mut self) {
        if self.state == ClockState::Idle {
            self.state = ClockState::Running;
            self.started_at = Some(Instant::now());
        }
    }

    /// Next tick, or `None` when the clock is idle or complete.
    pub fn next_tick(&mut self) -> Option<Tick> {
        if self.state != ClockState::Running {
            return None;
        }
        let frame = self.next;
        let elapsed_ms = self.fps.frames_to_secs(frame) * 1000.0;
        let is_last = frame + 1 >= self.frame_count;
        let progress = if is_last || self.duration_ms == 0 {
            1.0
        } else {
            clamp01(elapsed_ms / self.duration_ms as f64)
        };

        if self.pacing == Pacing::RealTime
            && let Some(start) = self.started_at
        {
            let due = start + Duration::from_secs_f64(elapsed_ms / 1000.0);
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }

        self.next += 1;
        if is_last {
            self.state = ClockState::Complete;
        }
        Some(Tick {
            frame,
            elapsed_ms,
            progress,
            is_last,
        })
    }
}

impl Iterator for SegmentClock {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        self.start();
        self.next_tick()
    }
}

/// Shared flag checked by the export loop between segments.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` after [`CancelToken::cancel`].
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
