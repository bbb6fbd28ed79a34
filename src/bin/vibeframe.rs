use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use vibeframe::model::{AspectRatio, ImageSize, Language, MediaRef, VisualStyle};
use vibeframe::pipeline::{
    ElevenLabsSpeech, GeminiClient, GenerationRequest, MediaFiller, PlaceholderImages,
    SpeechSynthesizer, run_pipeline, translate_project,
};
use vibeframe::{Config, Container, ExportOptions, Exporter, Fps, Pacing, Project, ProjectMode};

#[derive(Parser, Debug)]
#[command(name = "vibeframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a project (slides and narration text) from a topic.
    Generate(GenerateArgs),
    /// Fill missing images and narration audio of a project.
    Media(MediaArgs),
    /// Translate every slide text of a project, dropping narration made for the old text.
    Translate(TranslateArgs),
    /// Export a project to a video file (requires `ffmpeg` on PATH).
    Export(ExportArgs),
    /// Render a single frame of the export timeline as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[arg(long)]
    topic: String,

    #[arg(long, value_enum, default_value_t = ModeChoice::Explainer)]
    mode: ModeChoice,

    /// Visual style, e.g. `Cinematic` or `Neon`.
    #[arg(long, default_value = "Cinematic")]
    style: String,

    #[arg(long, default_value = "")]
    tone: String,

    /// Narration language code, e.g. `EN` or `LV`.
    #[arg(long, default_value = "LV")]
    language: String,

    #[arg(long, value_enum, default_value_t = AspectChoice::Landscape)]
    aspect: AspectChoice,

    #[arg(long, value_enum, default_value_t = SizeChoice::OneK)]
    image_size: SizeChoice,

    /// Optional source document read by the analyst.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output project JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct MediaArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output project JSON; defaults to overwriting the input.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Narration language code.
    #[arg(long, default_value = "LV")]
    language: String,

    /// Skip speech synthesis.
    #[arg(long)]
    no_speech: bool,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output project JSON; defaults to overwriting the input.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Target language code, e.g. `EN` or `LV`.
    #[arg(long)]
    language: String,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    container: Option<ContainerChoice>,

    #[arg(long)]
    fps: Option<u32>,

    /// Background music, overriding the project's.
    #[arg(long)]
    music: Option<String>,

    /// Music gain in `[0, 0.5]`.
    #[arg(long)]
    music_volume: Option<f32>,

    #[arg(long)]
    logo: Option<String>,

    /// TTF/OTF font for on-screen text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Pace frames to wall-clock time.
    #[arg(long)]
    realtime: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline position in milliseconds.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    #[arg(long)]
    font: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Explainer,
    Presentation,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AspectChoice {
    Landscape,
    Portrait,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SizeChoice {
    #[value(name = "1k")]
    OneK,
    #[value(name = "4k")]
    FourK,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ContainerChoice {
    Mp4,
    Webm,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args, &config),
        Command::Media(args) => cmd_media(args, &config),
        Command::Translate(args) => cmd_translate(args, &config),
        Command::Export(args) => cmd_export(args, &config),
        Command::Frame(args) => cmd_frame(args, &config),
    }
}

fn cmd_generate(args: GenerateArgs, config: &Config) -> anyhow::Result<()> {
    let generator = GeminiClient::from_config(config)?;
    let source_text = match &args.source {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("read source document '{}'", p.display()))?,
        None => String::new(),
    };

    let mode = match args.mode {
        ModeChoice::Explainer => ProjectMode::Explainer,
        ModeChoice::Presentation => ProjectMode::Presentation,
    };
    let mut req = GenerationRequest::new(args.topic, mode);
    req.style = parse_named::<VisualStyle>(&args.style)?;
    req.language = parse_named::<Language>(&args.language)?;
    req.tone = args.tone;
    req.source_text = source_text;
    req.aspect_ratio = match args.aspect {
        AspectChoice::Landscape => AspectRatio::Landscape,
        AspectChoice::Portrait => AspectRatio::Portrait,
    };
    req.image_size = match args.image_size {
        SizeChoice::OneK => ImageSize::Size1K,
        SizeChoice::FourK => ImageSize::Size4K,
    };

    let project = run_pipeline(&generator, config, &req, &mut |agent: &str, status: &str| {
        eprintln!("[{agent}] {status}");
    })?;
    write_project(&project, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_media(args: MediaArgs, config: &Config) -> anyhow::Result<()> {
    let mut project = read_project(&args.in_path)?;
    let language = parse_named::<Language>(&args.language)?;

    let speech = if args.no_speech {
        None
    } else {
        match ElevenLabsSpeech::from_config(config) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis disabled");
                None
            }
        }
    };
    let images = PlaceholderImages;
    let filler = MediaFiller::new(
        &images,
        speech.as_ref().map(|s| s as &dyn SpeechSynthesizer),
        language,
    );
    filler.fill(&mut project, &mut |p: &str| {
        if !p.is_empty() {
            eprintln!("{p}");
        }
    });

    let out = args.out.unwrap_or(args.in_path);
    write_project(&project, &out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_translate(args: TranslateArgs, config: &Config) -> anyhow::Result<()> {
    let mut project = read_project(&args.in_path)?;
    let language = parse_named::<Language>(&args.language)?;
    let generator = GeminiClient::from_config(config)?;

    translate_project(&generator, &mut project, language, &mut |p: &str| {
        if !p.is_empty() {
            eprintln!("{p}");
        }
    });

    let out = args.out.unwrap_or(args.in_path);
    write_project(&project, &out)?;
    eprintln!("wrote {} ({})", out.display(), language.name());
    Ok(())
}

fn cmd_export(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let opts = ExportOptions {
        music: args.music.map(MediaRef::new),
        music_volume: args.music_volume,
        logo: args.logo.map(MediaRef::new),
        output_dir: args.out_dir,
        container: args.container.map(|c| match c {
            ContainerChoice::Mp4 => Container::Mp4,
            ContainerChoice::Webm => Container::Webm,
        }),
        font_path: args.font,
        fps: args.fps.map(|n| Fps::new(n, 1)).transpose()?,
        pacing: if args.realtime {
            Pacing::RealTime
        } else {
            Pacing::Offline
        },
        ..ExportOptions::default()
    };

    let artifact = vibeframe::export_video(&project, &opts, config, |p| {
        if !p.is_empty() {
            eprintln!("{p}");
        }
    })?;
    eprintln!(
        "wrote {} ({} frames, {} ms)",
        artifact.path.display(),
        artifact.frames,
        artifact.duration_ms
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs, config: &Config) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let opts = ExportOptions {
        font_path: args.font,
        ..ExportOptions::default()
    };
    let frame = Exporter::new(config, &opts).render_frame_at(&project, args.at_ms)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_project(path: &Path) -> anyhow::Result<Project> {
    let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
    let project: Project = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse project JSON '{}'", path.display()))?;
    project.validate()?;
    Ok(project)
}

fn write_project(project: &Project, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json).with_context(|| format!("write project '{}'", path.display()))?;
    Ok(())
}

/// Parse an enum by its serialized name, e.g. `"Neon"` or `"EN"`.
fn parse_named<T: serde::de::DeserializeOwned>(s: &str) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::String(s.trim().to_string()))
        .with_context(|| format!("unknown value '{s}'"))
}
