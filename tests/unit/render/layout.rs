use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn explainer_panel_landscape_geometry() {
    let p = explainer_panel(Canvas::LANDSCAPE);
    assert_eq!(p.rect, Rect::new(384.0, 656.0, 1536.0, 980.0));
    assert_eq!(p.text_x, 434.0);
    assert_eq!(p.text_top, 706.0);
    assert_eq!(p.text_max_width, 1052.0);
    assert_eq!(p.font_px, 50.0);
    assert_eq!(p.line_top(3), 886.0);
}

#[test]
fn explainer_panel_portrait_is_wider_with_smaller_text() {
    let p = explainer_panel(Canvas::PORTRAIT);
    assert!((p.rect.width() - 972.0).abs() < 1e-9);
    assert!((p.rect.height() - 576.0).abs() < 1e-9);
    assert_eq!(p.rect.y1, 1820.0);
    assert_eq!(p.font_px, 40.0);
}

#[test]
fn caret_follows_last_line() {
    let p = explainer_panel(Canvas::LANDSCAPE);
    let c = p.caret(1, 200.0);
    assert_eq!(c, Rect::new(639.0, 766.0, 644.0, 816.0));
}

#[test]
fn point_rows_stack_by_orientation_gap() {
    let a = point_row(Canvas::LANDSCAPE, 0);
    let b = point_row(Canvas::LANDSCAPE, 2);
    assert_eq!(a.bullet_center, Point::new(200.0, 358.0));
    assert_eq!(b.text_center_y - a.text_center_y, 240.0);
    assert_eq!(a.box_rect, Rect::new(250.0, 308.0, 1670.0, 408.0));
    assert_eq!(a.text_x, 290.0);

    let p = point_row(Canvas::PORTRAIT, 1);
    assert_eq!(p.bullet_center.x, 100.0);
    assert_eq!(p.box_rect.x0, 150.0);
    assert_eq!(p.box_rect.width(), 830.0);
    assert_eq!(p.text_center_y - point_row(Canvas::PORTRAIT, 0).text_center_y, 140.0);
}

#[test]
fn heading_sits_at_twenty_percent() {
    let h = heading(Canvas::PORTRAIT);
    assert_eq!(h.center_x, 540.0);
    assert!(approx(h.baseline_y, 384.0));
    assert_eq!(h.font_px, 60.0);
}

#[test]
fn logo_keeps_aspect_in_top_right() {
    let r = logo_rect(Canvas::LANDSCAPE, 300, 100);
    assert_eq!((r.x0, r.y0, r.x1), (1730.0, 40.0, 1880.0));
    assert!(approx(r.y1, 90.0));
}

#[test]
fn cover_fills_canvas_and_stays_centered() {
    let square = cover_rect(Canvas::LANDSCAPE, 100, 100);
    assert!(approx(square.width(), 1920.0));
    assert!(approx(square.height(), 1920.0));
    assert!(approx(square.y0, -420.0));

    let exact = cover_rect(Canvas::LANDSCAPE, 1920, 1080);
    assert_eq!(exact, Canvas::LANDSCAPE.rect());
}
