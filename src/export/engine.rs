use std::path::PathBuf;

use tracing::{debug, info};

use crate::assets::{AssetLoader, LoadedAssets};
use crate::audio::{build_audio_manifest, mix_manifest, write_mix_to_f32le_file};
use crate::config::{Config, Container};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::export::artifact::{ExportArtifact, PartFile, export_filename};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{VibeError, VibeResult};
use crate::model::{MediaRef, Project, clamp_music_volume};
use crate::playback::{CancelToken, Pacing, SegmentClock};
use crate::render::backend::FrameRGBA;
use crate::render::frame::FrameRenderer;
use crate::render::text::TextLayoutEngine;
use crate::timeline::{Timeline, build_timeline};

/// Per-run options. Unset fields fall back to the project, then to [`Config`] export defaults.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Background music; overrides `Project::background_music`.
    pub music: Option<MediaRef>,
    /// Music gain; overrides `Project::music_volume`. Clamped to `[0, 0.5]`.
    pub music_volume: Option<f32>,
    /// Logo; overrides `Project::logo`.
    pub logo: Option<MediaRef>,
    /// Output directory; overrides the configured one.
    pub output_dir: Option<PathBuf>,
    /// Output container.
    pub container: Option<Container>,
    /// Font for on-screen text.
    pub font_path: Option<PathBuf>,
    /// Frame rate.
    pub fps: Option<Fps>,
    /// Offline or wall-clock paced rendering.
    pub pacing: Pacing,
    /// Checked before every segment.
    pub cancel: CancelToken,
}

/// Counters for a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Timeline segments rendered, pads included.
    pub segments: u64,
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Timeline length.
    pub duration_ms: u64,
}

/// Drives asset loading, segmenting, mixing and the per-segment render loop.
pub struct Exporter<'a> {
    config: &'a Config,
    opts: &'a ExportOptions,
}

impl<'a> Exporter<'a> {
    /// Exporter reading defaults from `config`.
    pub fn new(config: &'a Config, opts: &'a ExportOptions) -> Self {
        Self { config, opts }
    }

    /// Effective frame rate.
    pub fn fps(&self) -> Fps {
        self.opts.fps.unwrap_or(self.config.export.fps)
    }

    /// Effective container.
    pub fn container(&self) -> Container {
        self.opts.container.unwrap_or(self.config.export.container)
    }

    /// Output path for `project` inside the configured output directory.
    pub fn output_path(&self, project: &Project) -> PathBuf {
        let dir = self
            .opts
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.export.output_dir.clone());
        dir.join(export_filename(&project.topic, self.container()))
    }

    /// Load every asset the run needs. Image failures abort; audio and logo failures do not.
    pub fn load_assets(&self, project: &Project) -> VibeResult<LoadedAssets> {
        let loader = AssetLoader::new(self.config.http_client()?);
        let music = self.opts.music.as_ref().or(project.background_music.as_ref());
        let logo = self.opts.logo.as_ref().or(project.logo.as_ref());
        loader.load(project, music, logo)
    }

    /// Render `project` into `sink`. The progress callback receives an empty string once the
    /// sink has been finalized.
    pub fn export_to_sink(
        &self,
        project: &Project,
        sink: &mut dyn FrameSink,
        on_progress: &mut dyn FnMut(&str),
    ) -> VibeResult<ExportStats> {
        let stats = self.run(project, sink, on_progress)?;
        on_progress("");
        Ok(stats)
    }

    #[tracing::instrument(skip_all, fields(topic = %project.topic, slides = project.slides.len()))]
    fn run(
        &self,
        project: &Project,
        sink: &mut dyn FrameSink,
        on_progress: &mut dyn FnMut(&str),
    ) -> VibeResult<ExportStats> {
        project.validate()?;
        let fps = self.fps();
        let canvas = project.canvas();

        on_progress("Loading images...");
        let assets = self.load_assets(project)?;
        let timeline = build_timeline(project, &assets)?;
        debug!(
            segments = timeline.len(),
            total_ms = timeline.total_ms(),
            "timeline built"
        );

        on_progress("Mixing audio...");
        let music_volume = clamp_music_volume(
            self.opts
                .music_volume
                .unwrap_or_else(|| project.clamped_music_volume()),
        );
        let manifest = build_audio_manifest(&timeline, fps, assets.music.clone(), music_volume);
        let mut audio_tmp = TempFileGuard(None);
        let audio = if manifest.is_silent() {
            None
        } else {
            let mixed = mix_manifest(&manifest);
            let path = std::env::temp_dir().join(format!(
                "vibeframe_audio_mix_{}_{}.f32le",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or(0)
            ));
            write_mix_to_f32le_file(&mixed, &path)?;
            audio_tmp.0 = Some(path.clone());
            Some(AudioInputConfig {
                path,
                sample_rate: manifest.sample_rate,
                channels: manifest.channels,
            })
        };

        let text = TextLayoutEngine::discover(self.font_path());
        let mut renderer = FrameRenderer::new(canvas, &assets, text)?;

        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
            audio,
        })?;

        match self.render_segments(project, &timeline, &mut renderer, sink, on_progress) {
            Ok(frames) => {
                on_progress("Finalizing video...");
                sink.end()?;
                let stats = ExportStats {
                    segments: timeline.len() as u64,
                    frames,
                    duration_ms: timeline.total_ms(),
                };
                info!(
                    frames = stats.frames,
                    duration_ms = stats.duration_ms,
                    "export finished"
                );
                Ok(stats)
            }
            Err(e) => {
                sink.abort();
                Err(e)
            }
        }
    }

    fn render_segments(
        &self,
        project: &Project,
        timeline: &Timeline,
        renderer: &mut FrameRenderer,
        sink: &mut dyn FrameSink,
        on_progress: &mut dyn FnMut(&str),
    ) -> VibeResult<u64> {
        let fps = self.fps();
        let slide_count = project.slides.len();
        let mut announced = None;
        let mut next_frame = 0u64;

        for segment in timeline.segments() {
            if self.opts.cancel.is_cancelled() {
                info!(frames = next_frame, "export cancelled");
                return Err(VibeError::Cancelled);
            }
            if !segment.is_pad() && announced != Some(segment.slide) {
                announced = Some(segment.slide);
                on_progress(&format!(
                    "Rendering slide {}/{}...",
                    segment.slide + 1,
                    slide_count
                ));
            }

            let clock = SegmentClock::new(segment.duration_ms, fps, self.opts.pacing);
            for tick in clock {
                let frame = renderer.render(
                    &project.slides,
                    segment,
                    tick.elapsed_ms,
                    tick.progress,
                )?;
                sink.push_frame(FrameIndex(next_frame), &frame)?;
                next_frame += 1;
            }
        }
        Ok(next_frame)
    }

    /// Render the single frame shown at `at_ms` on the export timeline.
    pub fn render_frame_at(&self, project: &Project, at_ms: u64) -> VibeResult<FrameRGBA> {
        project.validate()?;
        let assets = self.load_assets(project)?;
        let timeline = build_timeline(project, &assets)?;
        let mut renderer = FrameRenderer::new(
            project.canvas(),
            &assets,
            TextLayoutEngine::discover(self.font_path()),
        )?;

        let mut offset = 0u64;
        let segments = timeline.segments();
        for (i, segment) in segments.iter().enumerate() {
            let end = offset + segment.duration_ms;
            if at_ms < end || i + 1 == segments.len() {
                let elapsed = at_ms.saturating_sub(offset).min(segment.duration_ms);
                let progress = if segment.duration_ms == 0 {
                    1.0
                } else {
                    elapsed as f64 / segment.duration_ms as f64
                };
                return renderer.render(&project.slides, segment, elapsed as f64, progress);
            }
            offset = end;
        }
        Err(VibeError::render("timeline has no segments"))
    }

    fn font_path(&self) -> Option<&std::path::Path> {
        self.opts
            .font_path
            .as_deref()
            .or(self.config.export.font_path.as_deref())
    }
}

/// Export `project` to a video file via the system `ffmpeg`.
///
/// The file is written as `<name>.part` and moved into place only after the encoder finishes;
/// on any error (including cancellation) nothing is left behind.
pub fn export_video(
    project: &Project,
    opts: &ExportOptions,
    config: &Config,
    mut on_progress: impl FnMut(&str),
) -> VibeResult<ExportArtifact> {
    let exporter = Exporter::new(config, opts);
    let container = exporter.container();
    let target = exporter.output_path(project);
    ensure_parent_dir(&target)?;
    let part = PartFile::new(&target);

    let mut sink_opts = FfmpegSinkOpts::new(part.part_path(), container);
    sink_opts.video_bitrate = config.export.video_bitrate;
    let mut sink = FfmpegSink::new(sink_opts);

    let stats = exporter.run(project, &mut sink, &mut on_progress)?;
    drop(sink);
    let path = part.commit()?;
    info!(path = %path.display(), "export written");
    on_progress("");

    Ok(ExportArtifact {
        path,
        container,
        frames: stats.frames,
        duration_ms: stats.duration_ms,
    })
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/engine.rs"]
mod tests;
