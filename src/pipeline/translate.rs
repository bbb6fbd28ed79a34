//! Project translation through the text model.
//!
//! Texts are sent as one JSON array per batch: all explainer bodies together, then one batch per
//! presentation slide (heading, intro, then each point's visual and spoken text). Replaced texts
//! go through the slide setters, so narration audio made for the old text is dropped.

use tracing::{info, warn};

use crate::foundation::error::{VibeError, VibeResult};
use crate::model::{Language, Project, SlideContent};
use crate::pipeline::agent::clean_json_fences;
use crate::pipeline::provider::TextGenerator;

/// Translate `texts` into `language` with one model call, keeping order and length.
///
/// Never fails. When the call errors or the reply is not a JSON array of exactly `texts.len()`
/// strings, each non-empty input comes back as `"[<language>] <text>"`.
pub fn translate_texts(
    generator: &dyn TextGenerator,
    texts: &[String],
    language: Language,
) -> Vec<String> {
    if texts.is_empty() {
        return Vec::new();
    }
    match request_translation(generator, texts, language) {
        Ok(out) => out,
        Err(e) => {
            warn!(
                language = language.name(),
                count = texts.len(),
                error = %e,
                "translation failed, marking texts instead"
            );
            texts.iter().map(|t| mark_untranslated(t, language)).collect()
        }
    }
}

fn request_translation(
    generator: &dyn TextGenerator,
    texts: &[String],
    language: Language,
) -> VibeResult<Vec<String>> {
    let system = format!(
        "Role: Translator.\n\
        Task: Translate the following JSON array of strings to {}.\n\
        Rules:\n\
        - Keep the number and order of the strings.\n\
        - Return ONLY the valid JSON array of strings.",
        language.name()
    );
    let user = serde_json::to_string(texts)?;
    let raw = generator.generate(&system, &user)?;
    let out: Vec<String> = serde_json::from_str(&clean_json_fences(&raw)).map_err(|e| {
        VibeError::provider(format!("translation is not a json array of strings: {e}"))
    })?;
    if out.len() != texts.len() {
        return Err(VibeError::provider(format!(
            "translation returned {} strings, expected {}",
            out.len(),
            texts.len()
        )));
    }
    Ok(out)
}

fn mark_untranslated(text: &str, language: Language) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("[{}] {text}", language.name())
    }
}

/// Translate every on-screen and spoken text of `project` into `language`.
///
/// Images and visual prompts are kept. Progress receives "Translating texts...", one
/// "Translating slide i/N..." per presentation slide, then an empty string.
#[tracing::instrument(skip_all, fields(slides = project.slides.len(), language = language.name()))]
pub fn translate_project(
    generator: &dyn TextGenerator,
    project: &mut Project,
    language: Language,
    on_progress: &mut dyn FnMut(&str),
) {
    on_progress("Translating texts...");

    let bodies: Vec<(usize, String)> = project
        .slides
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match &s.content {
            SlideContent::Explainer { text, .. } => Some((i, text.clone())),
            SlideContent::Presentation { .. } => None,
        })
        .collect();
    if !bodies.is_empty() {
        let texts: Vec<String> = bodies.iter().map(|(_, t)| t.clone()).collect();
        let translated = translate_texts(generator, &texts, language);
        for ((i, _), text) in bodies.iter().zip(translated) {
            project.slides[*i].set_text(text);
        }
    }

    let total = project.slides.len();
    for (i, slide) in project.slides.iter_mut().enumerate() {
        let SlideContent::Presentation {
            heading,
            intro,
            points,
        } = &slide.content
        else {
            continue;
        };
        let point_count = points.len();
        let mut batch = Vec::with_capacity(2 + 2 * point_count);
        batch.push(heading.clone());
        batch.push(intro.text.clone());
        for p in points {
            batch.push(p.visual_text.clone());
            batch.push(p.spoken_text.clone());
        }

        let mut translated = translate_texts(generator, &batch, language).into_iter();
        if let (Some(h), Some(intro_text)) = (translated.next(), translated.next()) {
            slide.set_heading(h);
            slide.set_intro_text(intro_text);
        }
        for p in 0..point_count {
            if let (Some(visual), Some(spoken)) = (translated.next(), translated.next()) {
                slide.set_point_text(p, visual, spoken);
            }
        }
        on_progress(&format!("Translating slide {}/{total}...", i + 1));
    }

    info!("project translated");
    on_progress("");
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/translate.rs"]
mod tests;
