use super::*;

fn by_chars(s: &str) -> f32 {
    s.chars().count() as f32
}

#[test]
fn reveal_is_floor_of_char_count() {
    assert_eq!(visible_char_count("Hello world", 0.0), 0);
    assert_eq!(visible_char_count("Hello world", 0.5), 5);
    assert_eq!(visible_char_count("Hello world", 1.0), 11);
    assert_eq!(visible_char_count("Hello world", 7.0), 11);
    assert_eq!(visible_char_count("Hello world", f64::NAN), 0);
    assert_eq!(revealed_prefix("Hello world", 0.5), "Hello");
}

#[test]
fn reveal_is_monotonic_and_respects_char_boundaries() {
    let text = "Sveiki, pasaule! Ārā ir ļoti skaisti.";
    let mut last = 0;
    for i in 0..=100 {
        let p = f64::from(i) / 100.0;
        let prefix = revealed_prefix(text, p);
        assert!(text.starts_with(prefix));
        let n = prefix.chars().count();
        assert!(n >= last);
        last = n;
    }
    assert_eq!(last, text.chars().count());
}

#[test]
fn wrap_never_splits_words() {
    let lines = wrap_words("aa bbb cccc dd", 7.0, by_chars);
    assert_eq!(lines, vec!["aa bbb", "cccc dd"]);

    let long = wrap_words("tiny extraordinarily x", 6.0, by_chars);
    assert_eq!(long, vec!["tiny", "extraordinarily", "x"]);

    assert!(wrap_words("   ", 10.0, by_chars).is_empty());
}

#[test]
fn only_the_last_lines_are_kept() {
    let lines: Vec<String> = (0..6).map(|i| format!("line {i}")).collect();
    let shown = last_lines(&lines, MAX_VISIBLE_LINES);
    assert_eq!(shown.len(), 4);
    assert_eq!(shown[0], "line 2");
    assert_eq!(last_lines(&lines[..2], MAX_VISIBLE_LINES).len(), 2);
}

#[test]
fn caret_blinks_at_half_duty() {
    assert!(caret_visible(0.0));
    assert!(caret_visible(499.0));
    assert!(!caret_visible(500.0));
    assert!(!caret_visible(999.0));
    assert!(caret_visible(1000.0));
}

#[test]
fn fontless_engine_measures_with_fixed_advance() {
    let mut engine = TextLayoutEngine::new();
    assert!(!engine.has_font());
    assert_eq!(engine.measure("abcd", 10.0), 4.0 * 10.0 * 0.55);
    assert!(
        engine
            .layout_line("abcd", 10.0, TextBrushRgba8::WHITE)
            .unwrap()
            .is_none()
    );
    assert!(engine.layout_line("x", 0.0, TextBrushRgba8::WHITE).is_err());
}

#[test]
fn system_font_measures_when_present() {
    let engine = TextLayoutEngine::discover(None);
    if !engine.has_font() {
        eprintln!("no system font found, skipping");
        return;
    }
    let mut engine = engine;
    let short = engine.measure("Hi", 50.0);
    let long = engine.measure("Hi there, world", 50.0);
    assert!(short > 0.0);
    assert!(long > short);
    assert!(engine.family_name().is_some());
}
