//! The five pipeline agents. Each one owns a prompt template and a typed response shape; the
//! shared retry policy lives in [`crate::pipeline::agent`].

use serde::{Deserialize, Deserializer};

use crate::foundation::error::VibeResult;
use crate::model::{ImageBranch, Language, VisualStyle};
use crate::pipeline::agent::call_with_retry;
use crate::pipeline::provider::TextGenerator;

/// Source characters forwarded to the analyst.
const SOURCE_SNIPPET_CHARS: usize = 1000;

/// Inputs shared by every agent of one run.
#[derive(Clone, Debug)]
pub struct AgentContext {
    /// Subject of the video.
    pub topic: String,
    /// Narration tone, free text.
    pub tone: String,
    /// Visual style for image prompts.
    pub style: VisualStyle,
    /// Optional source material; empty when absent.
    pub source_text: String,
    /// Output language.
    pub language: Language,
}

/// Analyst reply.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Analysis {
    /// Themes the rest of the run builds on.
    #[serde(default)]
    pub key_themes: Vec<String>,
    /// Image branch suggested for the whole topic.
    #[serde(default, deserialize_with = "lenient_branch")]
    pub dominant_branch: Option<ImageBranch>,
}

/// One planned presentation slide.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OutlineSlide {
    /// Slide heading.
    pub title: String,
    /// What the slide should convey.
    #[serde(default)]
    pub purpose: String,
    /// Image branch for this slide.
    #[serde(default, deserialize_with = "lenient_branch")]
    pub image_branch: Option<ImageBranch>,
}

/// Structure architect reply.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Outline {
    /// Planned slides in order.
    pub slides: Vec<OutlineSlide>,
}

/// One explainer narration segment.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptSegment {
    /// Narration text.
    pub text: String,
    /// Idea for the slide image.
    #[serde(default)]
    pub visual_idea: String,
    /// Image branch for this segment.
    #[serde(default, deserialize_with = "lenient_branch")]
    pub image_branch: Option<ImageBranch>,
}

/// Scriptwriter reply.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Script {
    /// Segments in order.
    pub segments: Vec<ScriptSegment>,
}

/// Drafted bullet point.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PointDraft {
    /// Short on-screen label.
    pub visual_text: String,
    /// Narration for the point.
    #[serde(default)]
    pub spoken_text: String,
}

/// Content detail reply for one presentation slide.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SlideDetails {
    /// Intro narration.
    #[serde(default)]
    pub intro_audio: Option<String>,
    /// Bullet points.
    #[serde(default)]
    pub points: Vec<PointDraft>,
    /// Idea for the slide image.
    #[serde(default)]
    pub visual_idea: Option<String>,
}

/// Visual director reply.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VisualPrompt {
    /// Image generation prompt.
    pub visual_prompt: String,
}

/// Accept any casing of `nature`/`technical`; anything else becomes `None` so the orchestrator
/// can fall back instead of failing the whole response.
fn lenient_branch<'de, D>(d: D) -> Result<Option<ImageBranch>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "nature" => Some(ImageBranch::Nature),
        "technical" => Some(ImageBranch::Technical),
        _ => None,
    }))
}

struct Caller<'a> {
    generator: &'a dyn TextGenerator,
    max_retries: u32,
}

impl Caller<'_> {
    fn call<T: serde::de::DeserializeOwned>(
        &self,
        agent: &str,
        system: &str,
        user: &str,
    ) -> VibeResult<T> {
        call_with_retry(self.generator, self.max_retries, system, user).into_result(agent)
    }
}

/// Extracts key themes from the topic and source.
pub struct AnalystAgent<'a>(Caller<'a>);
/// Plans presentation slides.
pub struct StructureArchitect<'a>(Caller<'a>);
/// Writes explainer narration.
pub struct ScriptwriterAgent<'a>(Caller<'a>);
/// Fills intro and points of a presentation slide.
pub struct ContentDetailAgent<'a>(Caller<'a>);
/// Turns a visual idea into an image prompt.
pub struct VisualDirector<'a>(Caller<'a>);

macro_rules! agent_ctor {
    ($($ty:ident),*) => {$(
        impl<'a> $ty<'a> {
            /// Agent calling `generator`, retrying up to `max_retries` extra times.
            pub fn new(generator: &'a dyn TextGenerator, max_retries: u32) -> Self {
                Self(Caller { generator, max_retries })
            }
        }
    )*};
}

agent_ctor!(
    AnalystAgent,
    StructureArchitect,
    ScriptwriterAgent,
    ContentDetailAgent,
    VisualDirector
);

impl AnalystAgent<'_> {
    /// Ask for key themes and a dominant image branch.
    pub fn analyze(&self, ctx: &AgentContext) -> VibeResult<Analysis> {
        let system = "Role: Senior Content Analyst.\n\
            Task: Analyze input. Extract themes.\n\
            CRITICAL DECISION: Determine dominant visual type.\n\
            - 'nature': Scenery, people, abstract, real world photos.\n\
            - 'technical': Diagrams, schematics, charts, chemical formulas, math.\n\
            Output JSON: { \"key_themes\": [\"string\"], \"dominant_branch\": \"nature\" | \"technical\" }";
        let snippet: String = ctx.source_text.chars().take(SOURCE_SNIPPET_CHARS).collect();
        let snippet = if snippet.trim().is_empty() {
            "No source".to_string()
        } else {
            snippet
        };
        let user = format!("Topic: {}. Source snippet: {snippet}", ctx.topic);
        self.0.call("Analyst", system, &user)
    }
}

impl StructureArchitect<'_> {
    /// Plan presentation slides around `themes`.
    pub fn create_outline(&self, ctx: &AgentContext, themes: &[String]) -> VibeResult<Outline> {
        let system = format!(
            "Role: Presentation Architect & Router. Language: {}.\n\
            Task: Create slide outline.\n\
            ROUTING LOGIC:\n\
            For EACH slide, decide \"image_branch\":\n\
            - 'nature': If slide needs emotional, photographic, or abstract background. (Text allowed).\n\
            - 'technical': If slide explains a System, Formula, Process Map, or Data. (STRICT NO TEXT IN IMAGE).\n\
            Output JSON: {{ \"slides\": [ {{ \"title\": \"Headline\", \"purpose\": \"Explains X\", \"image_branch\": \"nature\" | \"technical\" }} ] }}",
            ctx.language.name()
        );
        let user = format!("Topic: {}. Themes: {}", ctx.topic, themes.join(", "));
        self.0.call("Architect", &system, &user)
    }
}

impl ScriptwriterAgent<'_> {
    /// Write explainer segments around `themes`.
    pub fn write_script(&self, ctx: &AgentContext, themes: &[String]) -> VibeResult<Script> {
        let system = format!(
            "Role: Documentary Scriptwriter & Router.\n\
            Tone: {}. Language: {}.\n\
            Task: Write narration segments.\n\
            ROUTING LOGIC:\n\
            For EACH segment, decide \"image_branch\":\n\
            - 'nature': Cinematic shots, real world, emotion.\n\
            - 'technical': Schematics, blueprints, diagrams.\n\
            Output JSON: {{ \"segments\": [ {{ \"text\": \"Narration...\", \"visual_idea\": \"Description...\", \"image_branch\": \"nature\" | \"technical\" }} ] }}",
            ctx.tone,
            ctx.language.name()
        );
        let user = format!("Topic: {}. Themes: {}", ctx.topic, themes.join(", "));
        self.0.call("Scriptwriter", &system, &user)
    }
}

impl ContentDetailAgent<'_> {
    /// Draft intro and points for the slide titled `title`.
    pub fn fill_slide_details(
        &self,
        ctx: &AgentContext,
        title: &str,
        purpose: &str,
        branch: ImageBranch,
    ) -> VibeResult<SlideDetails> {
        let system = format!(
            "Role: Presentation Expert. Language: {}.\n\
            Task: Create content for slide \"{title}\" ({} mode).\n\
            Output JSON: {{ \"intro_audio\": \"Short spoken intro...\", \"points\": [ {{ \"visual_text\": \"Short bullet\", \"spoken_text\": \"Long explanation\" }} ], \"visual_idea\": \"Description of the visual background\" }}",
            ctx.language.name(),
            branch_name(branch)
        );
        let user = format!("Context: {purpose}. Tone: {}", ctx.tone);
        self.0.call("Content Expert", &system, &user)
    }
}

impl VisualDirector<'_> {
    /// Write an image prompt for `visual_idea`.
    pub fn create_prompt(
        &self,
        ctx: &AgentContext,
        visual_idea: &str,
        branch: ImageBranch,
    ) -> VibeResult<VisualPrompt> {
        let system = visual_director_template(branch, ctx.style);
        let user = format!("Idea: {visual_idea}");
        self.0.call("Director", &system, &user)
    }
}

/// Prompt template for `branch`: cinematic imagery, or text-free technical diagrams.
pub fn visual_director_template(branch: ImageBranch, style: VisualStyle) -> String {
    match branch {
        ImageBranch::Nature => format!(
            "Role: NATURE/CINEMATIC Prompt Engineer.\n\
            Style: {}.\n\
            Task: Create a high-quality image prompt.\n\
            Rules:\n\
            - Make it aesthetic, lighting-focused (golden hour, cinematic).\n\
            - Text inside image is ALLOWED if appropriate (signs, titles).\n\
            Output JSON: {{ \"visual_prompt\": \"Cinematic shot of...\" }}",
            style.as_str()
        ),
        ImageBranch::Technical => "Role: TECHNICAL DIAGRAM Prompt Engineer.\n\
            Style: Technical Line Drawing / Blueprint / Clean Schematic.\n\
            Task: Create a structural diagram prompt.\n\
            CRITICAL CONSTRAINTS:\n\
            - NO TEXT, NO LETTERS, NO NUMBERS in the image.\n\
            - Only empty boxes, lines, arrows, geometric shapes.\n\
            - Clean white or dark solid background.\n\
            Output JSON: { \"visual_prompt\": \"Technical schematic of... NO TEXT, empty placeholder boxes...\" }"
            .to_string(),
    }
}

pub(crate) fn branch_name(branch: ImageBranch) -> &'static str {
    match branch {
        ImageBranch::Nature => "nature",
        ImageBranch::Technical => "technical",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/agents.rs"]
mod tests;
