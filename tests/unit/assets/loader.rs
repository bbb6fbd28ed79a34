use std::io::Cursor;

use super::*;
use crate::model::{Point, ProjectMode};

fn png_ref(px: [u8; 4]) -> MediaRef {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    MediaRef::embed("image/png", &buf)
}

fn loader() -> AssetLoader {
    AssetLoader::new(reqwest::blocking::Client::new())
}

#[test]
fn loads_images_and_skips_broken_audio() {
    let mut slide = Slide::presentation(
        "p1",
        "Heading",
        "intro",
        vec![Point::new("a", "alpha"), Point::new("b", "beta")],
        "prompt",
    );
    slide.image = Some(png_ref([10, 20, 30, 255]));
    if let SlideContent::Presentation { intro, points, .. } = &mut slide.content {
        intro.audio = Some(MediaRef::new("/no/such/intro.mp3"));
        points[1].audio = Some(MediaRef::new("data:audio/mpeg;base64,"));
    }
    let project = Project::new("t", ProjectMode::Presentation, vec![slide]);

    let logo = MediaRef::new("/no/such/logo.png");
    let loaded = loader().load(&project, None, Some(&logo)).unwrap();
    assert_eq!(loaded.slides.len(), 1);
    let s = &loaded.slides[0];
    assert_eq!((s.image.width, s.image.height), (4, 4));
    assert!(s.intro_audio.is_none());
    assert_eq!(s.point_audio.len(), 2);
    assert!(s.point_audio.iter().all(Option::is_none));
    assert!(loaded.music.is_none());
    assert!(loaded.logo.is_none());
}

#[test]
fn missing_image_is_fatal() {
    let mut ok = Slide::explainer("a", "one", "p");
    ok.image = Some(png_ref([0, 0, 0, 255]));
    let missing = Slide::explainer("b", "two", "p");
    let project = Project::new("t", ProjectMode::Explainer, vec![ok, missing]);

    let err = loader().load(&project, None, None).unwrap_err();
    match err {
        VibeError::Asset(msg) => assert!(msg.contains("slide 2"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undecodable_image_is_fatal() {
    let mut s = Slide::explainer("a", "one", "p");
    s.image = Some(MediaRef::embed("image/png", b"nope"));
    let project = Project::new("t", ProjectMode::Explainer, vec![s]);
    assert!(matches!(
        loader().load(&project, None, None),
        Err(VibeError::Asset(_))
    ));
}

#[test]
fn identical_references_share_one_decode() {
    let l = loader();
    let r = png_ref([1, 2, 3, 255]);
    let a = l.image(&r).unwrap();
    let b = l.image(&r).unwrap();
    assert!(Arc::ptr_eq(&a.rgba8_premul, &b.rgba8_premul));
}
