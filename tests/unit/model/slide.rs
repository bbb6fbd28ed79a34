use super::*;

fn sample_presentation() -> Slide {
    let mut s = Slide::presentation(
        "s1",
        "Heading",
        "Intro words here",
        vec![Point::new("A", "alpha spoken"), Point::new("B", "beta spoken")],
        "prompt",
    );
    if let SlideContent::Presentation { intro, points, .. } = &mut s.content {
        intro.audio = Some(MediaRef::new("intro.mp3"));
        intro.duration_ms = Some(1200);
        points[0].audio = Some(MediaRef::new("a.mp3"));
        points[0].duration_ms = Some(800);
        points[1].duration_ms = Some(500);
    }
    s
}

#[test]
fn content_kind_is_explicit_in_json() {
    let s = Slide::explainer("x", "hello", "prompt");
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["content"]["kind"], "explainer");

    let p = sample_presentation();
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["content"]["kind"], "presentation");
    let back: Slide = serde_json::from_value(v).unwrap();
    assert_eq!(back, p);
}

#[test]
fn segment_count_per_kind() {
    assert_eq!(Slide::explainer("x", "t", "p").segment_count(), 1);
    assert_eq!(sample_presentation().segment_count(), 3);
}

#[test]
fn set_text_invalidates_audio_and_duration() {
    let mut s = Slide::explainer("x", "old", "p");
    if let SlideContent::Explainer { audio, .. } = &mut s.content {
        *audio = Some(MediaRef::new("a.mp3"));
    }
    s.duration_ms = 4000;
    s.set_text("new");
    assert_eq!(s.duration_ms, 0);
    assert!(matches!(
        &s.content,
        SlideContent::Explainer { text, audio: None } if text == "new"
    ));
}

#[test]
fn point_edit_only_drops_audio_when_spoken_text_changes() {
    let mut s = sample_presentation();
    s.set_point_text(0, "A2", "alpha spoken");
    let SlideContent::Presentation { points, .. } = &s.content else {
        panic!("expected presentation");
    };
    assert_eq!(points[0].visual_text, "A2");
    assert!(points[0].audio.is_some());

    s.set_point_text(0, "A2", "changed");
    let SlideContent::Presentation { points, .. } = &s.content else {
        panic!("expected presentation");
    };
    assert!(points[0].audio.is_none());
    assert!(points[0].duration_ms.is_none());
}

#[test]
fn visual_prompt_edit_clears_image() {
    let mut s = Slide::explainer("x", "t", "p");
    s.image = Some(MediaRef::new("img.png"));
    s.set_visual_prompt("other");
    assert!(s.image.is_none());
}

#[test]
fn recompute_duration_sums_intro_and_points() {
    let mut s = sample_presentation();
    s.recompute_duration();
    assert_eq!(s.duration_ms, 1200 + 800 + 500);
}

#[test]
fn speech_estimate_uses_words_per_minute() {
    assert_eq!(estimate_speech_ms(""), 0);
    assert_eq!(estimate_speech_ms("one"), 400);
    let text = vec!["w"; 150].join(" ");
    assert_eq!(estimate_speech_ms(&text), 60_000);
}
