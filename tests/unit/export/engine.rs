use std::io::Cursor;

use super::*;
use crate::model::{ProjectMode, Slide};

fn png_ref(px: [u8; 4]) -> MediaRef {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    MediaRef::embed("image/png", &buf)
}

fn two_slide_project() -> Project {
    let mut a = Slide::explainer("a", "Hello world", "p");
    a.image = Some(png_ref([200, 0, 0, 255]));
    a.duration_ms = 2000;
    let mut b = Slide::explainer("b", "Second slide", "p");
    b.image = Some(png_ref([0, 0, 200, 255]));
    Project::new("Test topic", ProjectMode::Explainer, vec![a, b])
}

/// Records frame indices without keeping full-size frames around.
#[derive(Default)]
struct CountingSink {
    begun: Option<SinkConfig>,
    indices: Vec<u64>,
    first_pixel: Option<[u8; 4]>,
    ended: bool,
    aborted: bool,
}

impl FrameSink for CountingSink {
    fn begin(&mut self, cfg: SinkConfig) -> VibeResult<()> {
        self.begun = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> VibeResult<()> {
        if self.first_pixel.is_none() {
            self.first_pixel = frame.pixel(960, 100);
        }
        self.indices.push(idx.0);
        Ok(())
    }

    fn end(&mut self) -> VibeResult<()> {
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

fn one_fps() -> ExportOptions {
    ExportOptions {
        fps: Some(Fps::new(1, 1).unwrap()),
        ..ExportOptions::default()
    }
}

#[test]
fn exports_every_segment_in_order() {
    let project = two_slide_project();
    let cfg = Config::default();
    let opts = one_fps();
    let mut sink = CountingSink::default();
    let mut progress = Vec::new();

    let stats = Exporter::new(&cfg, &opts)
        .export_to_sink(&project, &mut sink, &mut |p: &str| progress.push(p.to_string()))
        .unwrap();

    // StartPad 1000 + two bodies at the 5000 ms floor + EndPad 2000.
    assert_eq!(stats.segments, 4);
    assert_eq!(stats.duration_ms, 13_000);
    assert_eq!(stats.frames, 13);
    assert_eq!(sink.indices, (0..13).collect::<Vec<_>>());
    assert!(sink.ended);
    assert!(!sink.aborted);

    let begun = sink.begun.as_ref().unwrap();
    assert_eq!((begun.width, begun.height), (1920, 1080));
    assert!(begun.audio.is_none());

    // Start pad shows the first slide image at full strength.
    let px = sink.first_pixel.unwrap();
    assert!(px[0] > 150 && px[2] < 50, "{px:?}");

    assert_eq!(
        progress,
        vec![
            "Loading images...",
            "Mixing audio...",
            "Rendering slide 1/2...",
            "Rendering slide 2/2...",
            "Finalizing video...",
            "",
        ]
    );
}

#[test]
fn cancelled_run_aborts_the_sink() {
    let project = two_slide_project();
    let cfg = Config::default();
    let opts = one_fps();
    opts.cancel.cancel();
    let mut sink = CountingSink::default();
    let mut progress = Vec::new();

    let err = Exporter::new(&cfg, &opts)
        .export_to_sink(&project, &mut sink, &mut |p: &str| progress.push(p.to_string()))
        .unwrap_err();
    assert!(matches!(err, VibeError::Cancelled));
    assert!(sink.aborted);
    assert!(!sink.ended);
    assert!(sink.indices.is_empty());
    assert!(!progress.iter().any(|p| p.is_empty()));
}

#[test]
fn missing_image_fails_before_the_sink_starts() {
    let mut project = two_slide_project();
    project.slides[1].image = None;
    let cfg = Config::default();
    let opts = one_fps();
    let mut sink = CountingSink::default();

    let err = Exporter::new(&cfg, &opts)
        .export_to_sink(&project, &mut sink, &mut |_: &str| {})
        .unwrap_err();
    assert!(matches!(err, VibeError::Asset(_)));
    assert!(sink.begun.is_none());
}

#[test]
fn missing_image_leaves_no_file() {
    let dir = std::env::temp_dir().join(format!("vibeframe_export_missing_{}", std::process::id()));
    let mut project = two_slide_project();
    project.slides[0].image = None;
    let opts = ExportOptions {
        output_dir: Some(dir.clone()),
        ..one_fps()
    };

    let err = export_video(&project, &opts, &Config::default(), |_| {}).unwrap_err();
    assert!(matches!(err, VibeError::Asset(_)));
    let leftovers = std::fs::read_dir(&dir)
        .map(|rd| rd.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn output_path_uses_options_then_config() {
    let project = two_slide_project();
    let mut cfg = Config::default();
    cfg.export.output_dir = PathBuf::from("/tmp/cfg_out");
    let opts = ExportOptions::default();
    assert_eq!(
        Exporter::new(&cfg, &opts).output_path(&project),
        PathBuf::from("/tmp/cfg_out/vibeframe_export_Test_topic.mp4")
    );

    let opts = ExportOptions {
        output_dir: Some(PathBuf::from("/tmp/opt_out")),
        container: Some(Container::Webm),
        ..ExportOptions::default()
    };
    assert_eq!(
        Exporter::new(&cfg, &opts).output_path(&project),
        PathBuf::from("/tmp/opt_out/vibeframe_export_Test_topic.webm")
    );
}

#[test]
fn render_frame_at_picks_the_covering_segment() {
    let project = two_slide_project();
    let cfg = Config::default();
    let opts = ExportOptions::default();
    let exporter = Exporter::new(&cfg, &opts);

    // Well past the crossfade into slide two.
    let frame = exporter.render_frame_at(&project, 8_000).unwrap();
    assert_eq!((frame.width, frame.height), (1920, 1080));
    let px = frame.pixel(960, 100).unwrap();
    assert!(px[2] > 150 && px[0] < 50, "{px:?}");

    // Beyond the end clamps to the end pad.
    assert!(exporter.render_frame_at(&project, 60_000).is_ok());
}

#[derive(Clone, Default)]
struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn missing_font_is_reported_at_most_once_per_run() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let project = two_slide_project();
    let cfg = Config::default();
    let opts = ExportOptions {
        font_path: Some(PathBuf::from("/nonexistent/vibeframe/font.ttf")),
        ..one_fps()
    };
    tracing::subscriber::with_default(subscriber, || {
        let mut sink = CountingSink::default();
        Exporter::new(&cfg, &opts)
            .export_to_sink(&project, &mut sink, &mut |_: &str| {})
            .unwrap();
    });

    let text = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    assert!(text.matches("no usable font found").count() <= 1, "{text}");
}
