use super::*;

/// Answers each agent by recognizing its role line. Detail calls for a purpose containing
/// "broken" and all director calls when `director_fails` return empty objects.
struct FakeModel {
    director_fails: bool,
    analyst_fails: bool,
}

impl TextGenerator for FakeModel {
    fn generate(&self, system: &str, user: &str) -> VibeResult<String> {
        let out = if system.contains("Content Analyst") {
            if self.analyst_fails {
                "{}"
            } else {
                r#"{"key_themes": ["heat", "rock"], "dominant_branch": "technical"}"#
            }
        } else if system.contains("Presentation Architect") {
            r#"{"slides": [
                {"title": "What is magma", "purpose": "Explains magma", "image_branch": "nature"},
                {"title": "Broken", "purpose": "broken slide"},
                {"title": "Eruptions", "purpose": "Explains eruptions"}
            ]}"#
        } else if system.contains("Presentation Expert") {
            if user.contains("broken") {
                "{}"
            } else {
                r#"{"intro_audio": "", "points": [{"visual_text": "Hot", "spoken_text": "It is hot"}], "visual_idea": "lava flow"}"#
            }
        } else if system.contains("Documentary Scriptwriter") {
            r#"{"segments": [
                {"text": "Volcanoes shape the land.", "visual_idea": "island", "image_branch": "nature"},
                {"text": "Pressure builds below.", "visual_idea": "chamber"}
            ]}"#
        } else if system.contains("Prompt Engineer") {
            if self.director_fails {
                "{}"
            } else {
                r#"{"visual_prompt": "generated prompt"}"#
            }
        } else {
            "{}"
        };
        Ok(out.to_string())
    }
}

fn model() -> FakeModel {
    FakeModel {
        director_fails: false,
        analyst_fails: false,
    }
}

fn fast_config() -> Config {
    let mut cfg = Config::default();
    cfg.text.max_retries = 1;
    cfg
}

#[test]
fn presentation_skips_slides_without_details() {
    let mut statuses = Vec::new();
    let mut req = GenerationRequest::new("Volcanoes", ProjectMode::Presentation);
    req.style = VisualStyle::Retro;
    let project = run_pipeline(&model(), &fast_config(), &req, &mut |a: &str, s: &str| {
        statuses.push((a.to_string(), s.to_string()))
    })
    .unwrap();

    assert_eq!(project.mode, ProjectMode::Presentation);
    assert_eq!(project.visual_style, VisualStyle::Retro);
    assert_eq!(project.slides.len(), 2);
    project.validate().unwrap();

    let first = &project.slides[0];
    assert_eq!(first.image_branch, Some(ImageBranch::Nature));
    assert_eq!(first.visual_prompt, "generated prompt");
    match &first.content {
        crate::model::SlideContent::Presentation {
            heading,
            intro,
            points,
        } => {
            assert_eq!(heading, "What is magma");
            assert_eq!(intro.text, DEFAULT_INTRO);
            assert_eq!(points.len(), 1);
            assert_eq!(points[0].spoken_text, "It is hot");
        }
        other => panic!("unexpected content: {other:?}"),
    }
    // Untagged outline item falls back to the analysis' dominant branch.
    assert_eq!(project.slides[1].image_branch, Some(ImageBranch::Technical));

    assert_eq!(statuses.first().map(|s| s.0.as_str()), Some("Analyst"));
    assert_eq!(
        statuses.last().map(|s| s.1.as_str()),
        Some("Finalizing project...")
    );
    assert!(statuses.iter().any(|(a, _)| a == "Architect"));
}

#[test]
fn explainer_substitutes_fallback_prompt() {
    let fake = FakeModel {
        director_fails: true,
        analyst_fails: false,
    };
    let mut req = GenerationRequest::new("Volcanoes", ProjectMode::Explainer);
    req.style = VisualStyle::Cyberpunk;
    let project = run_pipeline(&fake, &fast_config(), &req, &mut |_: &str, _: &str| {}).unwrap();

    assert_eq!(project.slides.len(), 2);
    assert_eq!(
        project.slides[0].visual_prompt,
        "Cyberpunk style image representing Volcanoes"
    );
    assert_eq!(project.slides[0].image_branch, Some(ImageBranch::Nature));
    assert_eq!(project.slides[1].image_branch, Some(ImageBranch::Technical));
}

#[test]
fn analyst_exhaustion_aborts_generation() {
    let fake = FakeModel {
        director_fails: false,
        analyst_fails: true,
    };
    let mut statuses = Vec::new();
    let req = GenerationRequest::new("Volcanoes", ProjectMode::Explainer);
    let err = run_pipeline(&fake, &fast_config(), &req, &mut |a: &str, s: &str| {
        statuses.push((a.to_string(), s.to_string()))
    })
    .unwrap_err();
    assert!(matches!(err, VibeError::Pipeline(_)));
    assert_eq!(statuses.last().map(|s| s.0.as_str()), Some("System"));
}

#[test]
fn branch_fallback_chain() {
    let none = Analysis::default();
    let technical = Analysis {
        key_themes: Vec::new(),
        dominant_branch: Some(ImageBranch::Technical),
    };
    assert_eq!(pick_branch(None, &none), ImageBranch::Nature);
    assert_eq!(pick_branch(None, &technical), ImageBranch::Technical);
    assert_eq!(
        pick_branch(Some(ImageBranch::Nature), &technical),
        ImageBranch::Nature
    );
}
