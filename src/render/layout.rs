//! Screen-space geometry of every on-screen element, per canvas orientation.

use crate::foundation::core::{Canvas, Point, Rect};

/// Translucent panel holding explainer body text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplainerPanel {
    /// Panel bounds.
    pub rect: Rect,
    /// Panel corner radius.
    pub corner_radius: f64,
    /// Left edge of every text line.
    pub text_x: f64,
    /// Top of the first text line.
    pub text_top: f64,
    /// Wrap width.
    pub text_max_width: f64,
    /// Body font size.
    pub font_px: f32,
    /// Distance between line tops.
    pub line_height: f64,
}

impl ExplainerPanel {
    /// Top of line `index` (0-based among the lines shown).
    pub fn line_top(&self, index: usize) -> f64 {
        self.text_top + self.line_height * index as f64
    }

    /// Caret bar after a line of `line_width` at `line_index`.
    pub fn caret(&self, line_index: usize, line_width: f64) -> Rect {
        let x = self.text_x + line_width + 5.0;
        let y = self.line_top(line_index);
        Rect::new(x, y, x + 5.0, y + 50.0)
    }
}

/// Translucent panel near the bottom of the canvas holding explainer narration text.
pub fn explainer_panel(canvas: Canvas) -> ExplainerPanel {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let portrait = canvas.is_portrait();

    let box_w = w * if portrait { 0.9 } else { 0.6 };
    let box_h = h * 0.3;
    let x0 = (w - box_w) / 2.0;
    let y0 = h - box_h - 100.0;
    ExplainerPanel {
        rect: Rect::new(x0, y0, x0 + box_w, y0 + box_h),
        corner_radius: 30.0,
        text_x: x0 + 50.0,
        text_top: y0 + 50.0,
        text_max_width: box_w - 100.0,
        font_px: if portrait { 40.0 } else { 50.0 },
        line_height: 60.0,
    }
}

/// Anchor and size of a presentation heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadingLayout {
    /// Horizontal center.
    pub center_x: f64,
    /// Text baseline.
    pub baseline_y: f64,
    /// Heading font size.
    pub font_px: f32,
}

/// Presentation headline, centered horizontally at 20% of the height.
pub fn heading(canvas: Canvas) -> HeadingLayout {
    HeadingLayout {
        center_x: f64::from(canvas.width) / 2.0,
        baseline_y: f64::from(canvas.height) * 0.2,
        font_px: if canvas.is_portrait() { 60.0 } else { 80.0 },
    }
}

/// Geometry of presentation point `index`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointRow {
    /// Center of the bullet dot.
    pub bullet_center: Point,
    /// Bullet dot radius.
    pub bullet_radius: f64,
    /// Label box.
    pub box_rect: Rect,
    /// Label box corner radius.
    pub corner_radius: f64,
    /// Left edge of the label.
    pub text_x: f64,
    /// Vertical center of the label.
    pub text_center_y: f64,
    /// Label font size.
    pub font_px: f32,
}

/// Row `index` of the bullet list.
pub fn point_row(canvas: Canvas, index: usize) -> PointRow {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let portrait = canvas.is_portrait();

    let gap = if portrait { 140.0 } else { 120.0 };
    let row_y = h * 0.35 + gap * index as f64;
    let box_x = if portrait { 150.0 } else { 250.0 };
    let box_w = w - if portrait { 250.0 } else { 500.0 };
    let box_y = row_y - 70.0;

    PointRow {
        bullet_center: Point::new(if portrait { 100.0 } else { 200.0 }, row_y - 20.0),
        bullet_radius: 15.0,
        box_rect: Rect::new(box_x, box_y, box_x + box_w, box_y + 100.0),
        corner_radius: 20.0,
        text_x: box_x + 40.0,
        text_center_y: row_y - 20.0,
        font_px: if portrait { 40.0 } else { 45.0 },
    }
}

/// Logo width; height follows its aspect.
pub const LOGO_WIDTH: f64 = 150.0;
/// Gap to the top and right edges.
pub const LOGO_PADDING: f64 = 40.0;
/// Logo opacity.
pub const LOGO_OPACITY: f32 = 0.8;

/// Logo box in the top-right corner, 150 px wide with the source aspect preserved.
pub fn logo_rect(canvas: Canvas, logo_w: u32, logo_h: u32) -> Rect {
    let ratio = f64::from(logo_h) / f64::from(logo_w.max(1));
    let x0 = f64::from(canvas.width) - LOGO_WIDTH - LOGO_PADDING;
    Rect::new(
        x0,
        LOGO_PADDING,
        x0 + LOGO_WIDTH,
        LOGO_PADDING + LOGO_WIDTH * ratio,
    )
}

/// Smallest centered rect with the image's aspect ratio that covers the whole canvas.
pub fn cover_rect(canvas: Canvas, img_w: u32, img_h: u32) -> Rect {
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let iw = f64::from(img_w.max(1));
    let ih = f64::from(img_h.max(1));
    let scale = (cw / iw).max(ch / ih);
    let w = iw * scale;
    let h = ih * scale;
    let x0 = (cw - w) / 2.0;
    let y0 = (ch - h) / 2.0;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
