//! Generation pipeline: turns a topic (and optional source text) into a [`crate::model::Project`]
//! through a fixed sequence of text-generation calls, then fills images and narration audio.

/// Retry loop and JSON extraction around single model calls.
pub mod agent;
pub mod agents;
/// Image and narration fill.
pub mod media;
/// Agent sequence producing a project.
pub mod orchestrator;
/// Hosted text model client.
pub mod provider;
pub mod translate;

pub use agent::{AgentOutcome, call_with_retry, clean_json_fences, parse_agent_json};
pub use agents::{
    AgentContext, Analysis, AnalystAgent, ContentDetailAgent, Outline, OutlineSlide, PointDraft,
    Script, ScriptSegment, ScriptwriterAgent, SlideDetails, StructureArchitect, VisualDirector,
    VisualPrompt,
};
pub use media::{
    ElevenLabsSpeech, IMAGE_FAILED_URL, ImageGenerator, MediaFiller, PlaceholderImages,
    SpeechSynthesizer, SynthesizedSpeech,
};
pub use orchestrator::{GenerationRequest, run_pipeline};
pub use provider::{GeminiClient, TextGenerator};
pub use translate::{translate_project, translate_texts};
