use std::sync::Mutex;

use super::*;
use crate::model::{Point, ProjectMode, Slide};

struct FailingImages;

impl ImageGenerator for FailingImages {
    fn generate(
        &self,
        _prompt: &str,
        _size: ImageSize,
        _aspect: AspectRatio,
        _style: VisualStyle,
    ) -> VibeResult<MediaRef> {
        Err(VibeError::provider("quota"))
    }
}

/// Speaks anything except texts containing "fail"; duration is 100 ms per word.
struct FakeSpeech {
    calls: Mutex<Vec<String>>,
}

impl FakeSpeech {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl SpeechSynthesizer for FakeSpeech {
    fn synthesize(&self, text: &str, _language: Language) -> VibeResult<SynthesizedSpeech> {
        self.calls.lock().unwrap().push(text.to_string());
        if text.contains("fail") {
            return Err(VibeError::provider("tts down"));
        }
        Ok(SynthesizedSpeech {
            audio: MediaRef::new(format!("/audio/{}.mp3", text.len())),
            duration_ms: Some(100 * text.split_whitespace().count() as u64),
        })
    }
}

#[test]
fn fills_explainer_media_with_fallbacks() {
    let mut project = Project::new(
        "t",
        ProjectMode::Explainer,
        vec![
            Slide::explainer("a", "two words", "p"),
            Slide::explainer("b", "this will fail", "p"),
        ],
    );
    let speech = FakeSpeech::new();
    let mut progress = Vec::new();
    MediaFiller::new(&FailingImages, Some(&speech), Language::English)
        .fill(&mut project, &mut |p: &str| progress.push(p.to_string()));

    let a = &project.slides[0];
    assert_eq!(a.image, Some(MediaRef::new(IMAGE_FAILED_URL)));
    assert_eq!(a.duration_ms, 200);
    assert!(matches!(&a.content, SlideContent::Explainer { audio: Some(_), .. }));

    let b = &project.slides[1];
    assert_eq!(b.duration_ms, DEFAULT_SLIDE_DURATION_MS);
    assert!(matches!(&b.content, SlideContent::Explainer { audio: None, .. }));

    assert_eq!(
        progress,
        vec!["Processing slide 1 of 2...", "Processing slide 2 of 2...", ""]
    );
}

#[test]
fn fills_presentation_audio_and_recomputes_total() {
    let mut slide = Slide::presentation(
        "p",
        "Heading",
        "intro has four words",
        vec![
            Point::new("A", "alpha beta"),
            Point::new("B", "please fail"),
            Point::new("C", ""),
        ],
        "prompt",
    );
    slide.image = Some(MediaRef::new("/existing.png"));
    let mut project = Project::new("t", ProjectMode::Presentation, vec![slide]);
    let speech = FakeSpeech::new();

    MediaFiller::new(&PlaceholderImages, Some(&speech), Language::Latvian)
        .fill(&mut project, &mut |_: &str| {});

    let s = &project.slides[0];
    assert_eq!(s.image, Some(MediaRef::new("/existing.png")));
    // intro 400 + alpha beta 200; the failed and empty points contribute nothing.
    assert_eq!(s.duration_ms, 600);
    let SlideContent::Presentation { intro, points, .. } = &s.content else {
        panic!("expected presentation");
    };
    assert_eq!(intro.duration_ms, Some(400));
    assert!(points[0].audio.is_some());
    assert!(points[1].audio.is_none());
    assert!(points[2].audio.is_none());
    assert_eq!(speech.calls.lock().unwrap().len(), 3);
}

#[test]
fn existing_audio_is_not_resynthesized() {
    let mut slide = Slide::explainer("a", "words here", "p");
    if let SlideContent::Explainer { audio, .. } = &mut slide.content {
        *audio = Some(MediaRef::new("/have.mp3"));
    }
    slide.duration_ms = 1234;
    let mut project = Project::new("t", ProjectMode::Explainer, vec![slide]);
    let speech = FakeSpeech::new();

    MediaFiller::new(&PlaceholderImages, Some(&speech), Language::English)
        .fill(&mut project, &mut |_: &str| {});

    assert!(speech.calls.lock().unwrap().is_empty());
    assert_eq!(project.slides[0].duration_ms, 1234);
    assert_eq!(
        project.slides[0].image,
        Some(MediaRef::new(
            "https://placehold.co/1280x720/22c55e/FFF?text=System+Online"
        ))
    );
}

#[test]
fn missing_synthesizer_uses_default_duration() {
    let mut project = Project::new(
        "t",
        ProjectMode::Explainer,
        vec![Slide::explainer("a", "hello", "p")],
    );
    MediaFiller::new(&PlaceholderImages, None, Language::English)
        .fill(&mut project, &mut |_: &str| {});
    assert_eq!(project.slides[0].duration_ms, DEFAULT_SLIDE_DURATION_MS);
}

#[test]
fn eleven_labs_requires_a_plausible_key() {
    let mut cfg = Config::default();
    cfg.speech.api_key = Some("short".to_string());
    assert!(ElevenLabsSpeech::from_config(&cfg).is_err());

    cfg.speech.api_key = Some("  sk_0123456789abcdef ".to_string());
    let speech = ElevenLabsSpeech::from_config(&cfg).unwrap();
    assert_eq!(speech.api_key, "sk_0123456789abcdef");
    assert!(speech.url().ends_with(&cfg.speech.voice_id));
}
