use super::*;
use crate::foundation::core::Point;

#[test]
fn crossfade_ramps_incoming_and_holds_outgoing() {
    let start = crossfade_at(0.0).unwrap();
    assert_eq!(start.outgoing, 1.0);
    assert_eq!(start.incoming, 0.0);

    let mid = crossfade_at(250.0).unwrap();
    assert_eq!(mid.outgoing, 1.0);
    assert!((mid.incoming - 0.25).abs() < 1e-6);

    let end = crossfade_at(1000.0).unwrap();
    assert_eq!(end.incoming, 1.0);
}

#[test]
fn crossfade_ends_after_one_second() {
    assert!(crossfade_at(1000.1).is_none());
    assert!(crossfade_at(5000.0).is_none());
    assert!(crossfade_at(f64::NAN).is_none());
}

#[test]
fn ken_burns_keeps_center_fixed_and_scales_corners() {
    let canvas = Canvas::LANDSCAPE;
    let center = Point::new(960.0, 540.0);

    let none = ken_burns(canvas, 0.0);
    assert_eq!(none * Point::new(0.0, 0.0), Point::new(0.0, 0.0));

    let full = ken_burns(canvas, 1.0);
    let c = full * center;
    assert!((c.x - 960.0).abs() < 1e-9 && (c.y - 540.0).abs() < 1e-9);
    let corner = full * Point::new(0.0, 0.0);
    assert!((corner.x + 96.0).abs() < 1e-9);
    assert!((corner.y + 54.0).abs() < 1e-9);

    let over = ken_burns(canvas, 3.0) * Point::new(0.0, 0.0);
    assert!((over.x - corner.x).abs() < 1e-9);
}
