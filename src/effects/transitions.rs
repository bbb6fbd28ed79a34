use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::foundation::math::{clamp01, lerp};

/// Length of the slide-to-slide image crossfade.
pub const CROSSFADE_MS: u64 = 1000;

/// Extra zoom reached at the end of a slide.
pub const KEN_BURNS_MAX_ZOOM: f64 = 0.1;

/// Opacities of the two background layers during a crossfade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossfade {
    /// Previous slide's image, drawn underneath.
    pub outgoing: f32,
    /// Current slide's image, drawn on top.
    pub incoming: f32,
}

/// Crossfade state `elapsed_ms` into the first segment of a slide, or `None` once it is over.
///
/// The outgoing image stays fully opaque underneath while the incoming one ramps linearly.
pub fn crossfade_at(elapsed_ms: f64) -> Option<Crossfade> {
    if elapsed_ms.is_nan() || elapsed_ms > CROSSFADE_MS as f64 {
        return None;
    }
    Some(Crossfade {
        outgoing: 1.0,
        incoming: clamp01(elapsed_ms / CROSSFADE_MS as f64) as f32,
    })
}

/// Ken Burns zoom at slide progress `p`, scaling about the canvas center.
pub fn ken_burns(canvas: Canvas, p: f64) -> Affine {
    let scale = lerp(1.0, 1.0 + KEN_BURNS_MAX_ZOOM, clamp01(p));
    let center = Vec2::new(f64::from(canvas.width) / 2.0, f64::from(canvas.height) / 2.0);
    Affine::translate(center) * Affine::scale(scale) * Affine::translate(-center)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
