use std::sync::Arc;

use kurbo::Shape;

use crate::assets::{LoadedAssets, PreparedImage};
use crate::effects::transitions::{crossfade_at, ken_burns};
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::{VibeError, VibeResult};
use crate::foundation::math::clamp01;
use crate::model::{Slide, SlideContent};
use crate::render::backend::FrameRGBA;
use crate::render::layout::{
    self, LOGO_OPACITY, cover_rect, explainer_panel, logo_rect, point_row,
};
use crate::render::text::{
    MAX_VISIBLE_LINES, TextBrushRgba8, TextLayoutEngine, caret_visible, last_lines,
    revealed_prefix, wrap_words,
};
use crate::timeline::{Segment, SegmentKind};

const PANEL_FILL: TextBrushRgba8 = TextBrushRgba8::new(0, 0, 0, 102);
const CARET: TextBrushRgba8 = TextBrushRgba8::new(34, 211, 238, 255);
const BULLET: TextBrushRgba8 = TextBrushRgba8::new(167, 139, 250, 255);
const POINT_FILL_CURRENT: TextBrushRgba8 = TextBrushRgba8::new(0, 0, 0, 153);
const POINT_FILL: TextBrushRgba8 = TextBrushRgba8::new(0, 0, 0, 128);
const POINT_BORDER: TextBrushRgba8 = TextBrushRgba8::new(34, 211, 238, 204);
const POINT_BORDER_WIDTH: f64 = 4.0;
const POINT_TEXT_DIM: TextBrushRgba8 = TextBrushRgba8::new(204, 204, 204, 255);
const HEADING_SHADOW: TextBrushRgba8 = TextBrushRgba8::new(0, 0, 0, 200);
const TEXT_SHADOW: TextBrushRgba8 = TextBrushRgba8::new(0, 0, 0, 255);
const EARLIER_POINT_OPACITY: f32 = 0.5;

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

#[derive(Clone, Copy, Debug)]
enum Anchor {
    /// Left edge and top of the line box.
    TopLeft { x: f64, y: f64 },
    /// Left edge and vertical middle of the line box.
    MiddleLeft { x: f64, y: f64 },
    /// Horizontal center and alphabetic baseline.
    BaselineCenter { x: f64, y: f64 },
}

/// Draws one output frame from a segment and its clock state.
///
/// Images are uploaded once at construction; every call to [`FrameRenderer::render`] redraws
/// the full frame back-to-front.
pub struct FrameRenderer {
    canvas: Canvas,
    text: TextLayoutEngine,
    ctx: Option<vello_cpu::RenderContext>,
    slides: Vec<ImagePaint>,
    logo: Option<ImagePaint>,
}

impl FrameRenderer {
    /// Renderer for `canvas`, uploading every slide image and the logo.
    pub fn new(canvas: Canvas, assets: &LoadedAssets, text: TextLayoutEngine) -> VibeResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(VibeError::validation("canvas width/height must be non-zero"));
        }
        let slides = assets
            .slides
            .iter()
            .map(|s| image_paint(&s.image))
            .collect::<VibeResult<Vec<_>>>()?;
        let logo = assets.logo.as_ref().map(image_paint).transpose()?;
        Ok(Self {
            canvas,
            text,
            ctx: None,
            slides,
            logo,
        })
    }

    /// Output size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render `segment` at `elapsed_ms` into it with clock progress `progress`.
    pub fn render(
        &mut self,
        slides: &[Slide],
        segment: &Segment,
        elapsed_ms: f64,
        progress: f64,
    ) -> VibeResult<FrameRGBA> {
        let slide = slides.get(segment.slide).ok_or_else(|| {
            VibeError::render(format!("segment refers to missing slide {}", segment.slide))
        })?;
        let progress = clamp01(progress);

        let w: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| VibeError::render("canvas width exceeds u16"))?;
        let h: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| VibeError::render("canvas height exceeds u16"))?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        let drawn = self.draw(&mut ctx, slide, segment, elapsed_ms, progress);
        let frame = drawn.map(|()| {
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);
            FrameRGBA {
                width: self.canvas.width,
                height: self.canvas.height,
                data: pixmap.data_as_u8_slice().to_vec(),
            }
        });
        self.ctx = Some(ctx);
        frame
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        slide: &Slide,
        segment: &Segment,
        elapsed_ms: f64,
        progress: f64,
    ) -> VibeResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(TextBrushRgba8::new(0, 0, 0, 255)));
        ctx.fill_rect(&rect_to_cpu(self.canvas.rect()));

        self.draw_background(ctx, segment, elapsed_ms)?;

        match (&slide.content, segment.kind) {
            (_, SegmentKind::StartPad) => {}
            (SlideContent::Explainer { text, .. }, kind) => {
                let reveal = if kind == SegmentKind::EndPad { 1.0 } else { progress };
                self.draw_explainer(ctx, text, reveal, elapsed_ms)?;
            }
            (SlideContent::Presentation { heading, points, .. }, kind) => {
                self.draw_heading(ctx, heading)?;
                let labels: Vec<&str> = points.iter().map(|p| p.visual_text.as_str()).collect();
                match kind {
                    SegmentKind::SlidePoint => {
                        let current = segment
                            .point
                            .unwrap_or(0)
                            .min(labels.len().saturating_sub(1));
                        if !labels.is_empty() {
                            self.draw_points(ctx, &labels[..=current], Some(current))?;
                        }
                    }
                    SegmentKind::EndPad => self.draw_points(ctx, &labels, None)?,
                    _ => {}
                }
            }
        }

        self.draw_logo(ctx);
        Ok(())
    }

    fn draw_background(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        segment: &Segment,
        elapsed_ms: f64,
    ) -> VibeResult<()> {
        let current = self.slide_image(segment.slide)?;
        let zoom = ken_burns(self.canvas, segment.slide_progress(elapsed_ms));

        let fade = segment
            .crossfade_from
            .and_then(|prev| crossfade_at(elapsed_ms).map(|f| (prev, f)));
        match fade {
            Some((prev, f)) => {
                // The previous slide finished its zoom; hold it there underneath.
                let prev_img = self.slide_image(prev)?;
                draw_image(ctx, prev_img, self.canvas, ken_burns(self.canvas, 1.0), f.outgoing);
                draw_image(ctx, current, self.canvas, zoom, f.incoming);
            }
            None => draw_image(ctx, current, self.canvas, zoom, 1.0),
        }
        Ok(())
    }

    fn draw_explainer(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        reveal: f64,
        elapsed_ms: f64,
    ) -> VibeResult<()> {
        let panel = explainer_panel(self.canvas);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(PANEL_FILL));
        ctx.fill_path(&rounded_rect_path(panel.rect, panel.corner_radius));

        let visible = revealed_prefix(text, reveal);
        let font_px = panel.font_px;
        let max_width = panel.text_max_width as f32;
        let lines = wrap_words(visible, max_width, |s| self.text.measure(s, font_px));
        let shown = last_lines(&lines, MAX_VISIBLE_LINES);

        for (i, line) in shown.iter().enumerate() {
            let at = Anchor::TopLeft {
                x: panel.text_x,
                y: panel.line_top(i),
            };
            self.draw_line(ctx, line, font_px, TextBrushRgba8::WHITE, at, Some(TEXT_SHADOW))?;
        }

        if reveal < 1.0 && caret_visible(elapsed_ms) {
            let last = shown.last().map(String::as_str).unwrap_or("");
            let width = if last.is_empty() {
                0.0
            } else {
                f64::from(self.text.measure(last, font_px))
            };
            let caret = panel.caret(shown.len().saturating_sub(1), width);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color(CARET));
            ctx.fill_rect(&rect_to_cpu(caret));
        }
        Ok(())
    }

    fn draw_heading(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        heading: &str,
    ) -> VibeResult<()> {
        let l = layout::heading(self.canvas);
        let at = Anchor::BaselineCenter {
            x: l.center_x,
            y: l.baseline_y,
        };
        self.draw_line(ctx, heading, l.font_px, TextBrushRgba8::WHITE, at, Some(HEADING_SHADOW))?;
        Ok(())
    }

    /// Draw point rows `0..labels.len()`. With `current` set, that row is emphasized and the
    /// others are dimmed; without it every row is drawn plain at full opacity.
    fn draw_points(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        labels: &[&str],
        current: Option<usize>,
    ) -> VibeResult<()> {
        for (j, label) in labels.iter().enumerate() {
            let row = point_row(self.canvas, j);
            let is_current = current == Some(j);
            let dimmed = current.is_some() && !is_current;

            if dimmed {
                ctx.push_opacity_layer(EARLIER_POINT_OPACITY);
            }
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

            ctx.set_paint(color(BULLET));
            ctx.fill_path(&shape_path(&kurbo::Circle::new(
                row.bullet_center,
                row.bullet_radius,
            )));

            let body = rounded_rect_path(row.box_rect, row.corner_radius);
            ctx.set_paint(color(if is_current { POINT_FILL_CURRENT } else { POINT_FILL }));
            ctx.fill_path(&body);
            if is_current {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(POINT_BORDER_WIDTH));
                ctx.set_paint(color(POINT_BORDER));
                ctx.stroke_path(&body);
            }

            let brush = if is_current {
                TextBrushRgba8::WHITE
            } else {
                POINT_TEXT_DIM
            };
            let at = Anchor::MiddleLeft {
                x: row.text_x,
                y: row.text_center_y,
            };
            self.draw_line(ctx, label, row.font_px, brush, at, None)?;

            if dimmed {
                ctx.pop_layer();
            }
        }
        Ok(())
    }

    fn draw_logo(&self, ctx: &mut vello_cpu::RenderContext) {
        let Some(logo) = self.logo.as_ref() else {
            return;
        };
        let rect = logo_rect(self.canvas, logo.w, logo.h);
        draw_image_into(ctx, logo, rect, Affine::IDENTITY, LOGO_OPACITY);
    }

    /// Shape and fill one line of text. Returns without drawing when no font is loaded.
    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font_px: f32,
        brush: TextBrushRgba8,
        at: Anchor,
        shadow: Option<TextBrushRgba8>,
    ) -> VibeResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let Some(layout) = self.text.layout_line(text, font_px, brush)? else {
            return Ok(());
        };
        let Some(font) = self.text.font_data() else {
            return Ok(());
        };

        let width = f64::from(layout.width());
        let height = f64::from(layout.height());
        let baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(height);
        let origin = match at {
            Anchor::TopLeft { x, y } => (x, y),
            Anchor::MiddleLeft { x, y } => (x, y - height / 2.0),
            Anchor::BaselineCenter { x, y } => (x - width / 2.0, y - baseline),
        };

        if let Some(shadow) = shadow {
            let offset = f64::from(font_px) * 0.06;
            let tr = Affine::translate((origin.0 + offset, origin.1 + offset));
            fill_layout_glyphs(ctx, &layout, font, tr, Some(shadow));
        }
        fill_layout_glyphs(ctx, &layout, font, Affine::translate(origin), None);
        Ok(())
    }

    fn slide_image(&self, index: usize) -> VibeResult<&ImagePaint> {
        self.slides
            .get(index)
            .ok_or_else(|| VibeError::render(format!("no image loaded for slide {}", index + 1)))
    }
}

fn fill_layout_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    transform: Affine,
    brush_override: Option<TextBrushRgba8>,
) {
    ctx.set_transform(affine_to_cpu(transform));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = brush_override.unwrap_or(run.style().brush);
            ctx.set_paint(color(brush));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Cover-fit `img` onto the canvas, then apply `post` (the Ken Burns zoom).
fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    img: &ImagePaint,
    canvas: Canvas,
    post: Affine,
    opacity: f32,
) {
    let rect = cover_rect(canvas, img.w, img.h);
    draw_image_into(ctx, img, rect, post, opacity);
}

fn draw_image_into(
    ctx: &mut vello_cpu::RenderContext,
    img: &ImagePaint,
    rect: Rect,
    post: Affine,
    opacity: f32,
) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    let place = Affine::translate((rect.x0, rect.y0))
        * Affine::scale_non_uniform(
            rect.width() / f64::from(img.w),
            rect.height() / f64::from(img.h),
        );
    ctx.set_transform(affine_to_cpu(post * place));
    ctx.set_paint(img.paint.clone());
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.w),
        f64::from(img.h),
    ));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn image_paint(img: &PreparedImage) -> VibeResult<ImagePaint> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(ImagePaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: img.width,
        h: img.height,
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> VibeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VibeError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VibeError::render("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(VibeError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn color(c: TextBrushRgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn rounded_rect_path(r: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let radius = radius.min(r.width() / 2.0).min(r.height() / 2.0).max(0.0);
    shape_path(&kurbo::RoundedRect::from_rect(r, radius))
}

fn shape_path(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        p.push(el);
    }
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
