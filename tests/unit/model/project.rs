use super::*;
use crate::model::slide::{Point, Slide};

#[test]
fn validate_rejects_empty_and_mismatched_slides() {
    let p = Project::new("t", ProjectMode::Explainer, vec![]);
    assert!(p.validate().is_err());

    let p = Project::new(
        "t",
        ProjectMode::Explainer,
        vec![Slide::presentation("s", "h", "i", vec![Point::new("a", "b")], "p")],
    );
    assert!(p.validate().is_err());

    let p = Project::new(
        "t",
        ProjectMode::Explainer,
        vec![Slide::explainer("s", "text", "p")],
    );
    assert!(p.validate().is_ok());
}

#[test]
fn music_volume_is_clamped() {
    assert_eq!(clamp_music_volume(0.9), MAX_MUSIC_VOLUME);
    assert_eq!(clamp_music_volume(-1.0), 0.0);
    assert_eq!(clamp_music_volume(f32::NAN), DEFAULT_MUSIC_VOLUME);
    assert_eq!(clamp_music_volume(0.2), 0.2);
}

#[test]
fn aspect_ratio_selects_canvas() {
    assert_eq!(AspectRatio::Landscape.canvas(), Canvas::LANDSCAPE);
    assert_eq!(AspectRatio::Portrait.canvas(), Canvas::PORTRAIT);
}

#[test]
fn enums_use_wire_names() {
    assert_eq!(
        serde_json::to_value(ProjectMode::Presentation).unwrap(),
        "PRESENTATION"
    );
    assert_eq!(serde_json::to_value(AspectRatio::Portrait).unwrap(), "9:16");
    assert_eq!(serde_json::to_value(ImageSize::Size4K).unwrap(), "4K");
    assert_eq!(serde_json::to_value(Language::German).unwrap(), "DE");
}

#[test]
fn project_json_defaults_music_volume() {
    let p = Project::new("t", ProjectMode::Explainer, vec![Slide::explainer("s", "x", "p")]);
    let mut v = serde_json::to_value(&p).unwrap();
    v.as_object_mut().unwrap().remove("music_volume");
    let back: Project = serde_json::from_value(v).unwrap();
    assert_eq!(back.music_volume, DEFAULT_MUSIC_VOLUME);
}
