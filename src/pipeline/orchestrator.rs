use tracing::{info, warn};

use crate::config::Config;
use crate::foundation::error::{VibeError, VibeResult};
use crate::model::{
    AspectRatio, ImageBranch, ImageSize, Language, Point, Project, ProjectMode, Slide,
    VisualStyle,
};
use crate::pipeline::agents::{
    AgentContext, Analysis, AnalystAgent, ContentDetailAgent, ScriptwriterAgent,
    StructureArchitect, VisualDirector, branch_name,
};
use crate::pipeline::provider::TextGenerator;

const DEFAULT_TONE: &str = "Professional";
const DEFAULT_INTRO: &str = "Introduction...";

/// What to generate.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Subject of the video.
    pub topic: String,
    /// Explainer or presentation.
    pub mode: ProjectMode,
    /// Visual style for image prompts.
    pub style: VisualStyle,
    /// Free-form tone; empty means professional.
    pub tone: String,
    /// Requested image resolution.
    pub image_size: ImageSize,
    /// Requested frame shape.
    pub aspect_ratio: AspectRatio,
    /// Optional document the analyst reads alongside the topic.
    pub source_text: String,
    /// Language of every generated text.
    pub language: Language,
}

impl GenerationRequest {
    /// Request with default style, size, aspect, language and no source text.
    pub fn new(topic: impl Into<String>, mode: ProjectMode) -> Self {
        Self {
            topic: topic.into(),
            mode,
            style: VisualStyle::default(),
            tone: String::new(),
            image_size: ImageSize::default(),
            aspect_ratio: AspectRatio::default(),
            source_text: String::new(),
            language: Language::default(),
        }
    }
}

/// Run analysis, outline or script, per-slide detail and visual prompts, producing a project
/// without media.
///
/// `on_status` receives `(agent_label, status_text)` at every stage. Any agent that exhausts
/// its retries aborts the run, except a failed presentation detail call (that slide is
/// skipped) and a failed explainer visual prompt (a generic prompt is substituted).
#[tracing::instrument(skip_all, fields(topic = %req.topic, mode = ?req.mode))]
pub fn run_pipeline(
    generator: &dyn TextGenerator,
    config: &Config,
    req: &GenerationRequest,
    on_status: &mut dyn FnMut(&str, &str),
) -> VibeResult<Project> {
    let result = generate_slides(generator, config.text.max_retries, req, on_status);
    let slides = match result {
        Ok(slides) => slides,
        Err(e) => {
            on_status("System", "Error! Generation aborted.");
            return Err(e);
        }
    };
    if slides.is_empty() {
        on_status("System", "Error! No slides were produced.");
        return Err(VibeError::pipeline("pipeline produced no slides"));
    }

    on_status("System", "Finalizing project...");
    let mut project = Project::new(req.topic.clone(), req.mode, slides);
    project.image_size = req.image_size;
    project.aspect_ratio = req.aspect_ratio;
    project.visual_style = req.style;
    info!(slides = project.slides.len(), "project generated");
    Ok(project)
}

fn generate_slides(
    generator: &dyn TextGenerator,
    max_retries: u32,
    req: &GenerationRequest,
    on_status: &mut dyn FnMut(&str, &str),
) -> VibeResult<Vec<Slide>> {
    let ctx = AgentContext {
        topic: req.topic.clone(),
        tone: if req.tone.trim().is_empty() {
            DEFAULT_TONE.to_string()
        } else {
            req.tone.clone()
        },
        style: req.style,
        source_text: req.source_text.clone(),
        language: req.language,
    };

    on_status("Analyst", "Analyzing the topic and choosing a visual branch...");
    let analysis = AnalystAgent::new(generator, max_retries).analyze(&ctx)?;
    let themes = if analysis.key_themes.is_empty() {
        vec![req.topic.clone()]
    } else {
        analysis.key_themes.clone()
    };
    info!(dominant = ?analysis.dominant_branch, themes = themes.len(), "analysis done");

    let director = VisualDirector::new(generator, max_retries);
    let id_base = chrono::Utc::now().timestamp_millis();
    let mut slides = Vec::new();

    match req.mode {
        ProjectMode::Presentation => {
            on_status("Architect", "Planning slide structure and types...");
            let outline =
                StructureArchitect::new(generator, max_retries).create_outline(&ctx, &themes)?;
            let detail_agent = ContentDetailAgent::new(generator, max_retries);

            for (i, s) in outline.slides.iter().enumerate() {
                let branch = pick_branch(s.image_branch, &analysis);
                on_status(
                    "Content Expert",
                    &format!(
                        "Generating content ({} mode): {}...",
                        branch_name(branch),
                        s.title
                    ),
                );
                let details =
                    match detail_agent.fill_slide_details(&ctx, &s.title, &s.purpose, branch) {
                        Ok(d) => d,
                        Err(e) => {
                            warn!(slide = %s.title, error = %e, "skipping slide without details");
                            continue;
                        }
                    };

                on_status(
                    "Director",
                    &format!("Drawing {} visual: {}...", branch_name(branch), s.title),
                );
                let idea = details
                    .visual_idea
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or(&s.purpose);
                let viz = director.create_prompt(&ctx, idea, branch)?;

                let intro = details
                    .intro_audio
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_INTRO.to_string());
                let points = details
                    .points
                    .into_iter()
                    .map(|p| Point::new(p.visual_text, p.spoken_text))
                    .collect();
                let mut slide = Slide::presentation(
                    format!("slide-{id_base}-{i}"),
                    s.title.clone(),
                    intro,
                    points,
                    viz.visual_prompt,
                );
                slide.image_branch = Some(branch);
                slides.push(slide);
            }
        }
        ProjectMode::Explainer => {
            on_status("Scriptwriter", "Writing the story and planning visuals...");
            let script =
                ScriptwriterAgent::new(generator, max_retries).write_script(&ctx, &themes)?;

            for (i, seg) in script.segments.iter().enumerate() {
                let branch = pick_branch(seg.image_branch, &analysis);
                on_status(
                    "Director",
                    &format!("Building {} scene {}...", branch_name(branch), i + 1),
                );
                let prompt = match director.create_prompt(&ctx, &seg.visual_idea, branch) {
                    Ok(v) => v.visual_prompt,
                    Err(e) => {
                        warn!(segment = i + 1, error = %e, "using fallback visual prompt");
                        fallback_visual_prompt(req.style, &req.topic)
                    }
                };

                let mut slide =
                    Slide::explainer(format!("slide-{id_base}-{i}"), seg.text.clone(), prompt);
                slide.image_branch = Some(branch);
                slides.push(slide);
            }
        }
    }
    Ok(slides)
}

/// Item tag, then the analysis' dominant branch, then nature.
pub fn pick_branch(item: Option<ImageBranch>, analysis: &Analysis) -> ImageBranch {
    item.or(analysis.dominant_branch).unwrap_or_default()
}

/// Image prompt used when the visual director fails.
pub fn fallback_visual_prompt(style: VisualStyle, topic: &str) -> String {
    format!("{} style image representing {topic}", style.as_str())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
