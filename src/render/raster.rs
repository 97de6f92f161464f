use crate::foundation::cancel::CancelToken;
use crate::foundation::color::Rgb8;
use crate::pattern::model::{Pattern, StitchKind};
use crate::render::image::RasterImage;
use crate::render::scale::ScaleChoice;
use vello_cpu::kurbo::{BezPath, Cap, Circle, Join, Point, Rect, Shape, Stroke};

/// Options for stroke rasterization.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Transparent margin around the scaled pattern, in pixels.
    pub padding: u32,
    /// Stroke color used when the pattern has no thread palette.
    pub default_stitch_color: Rgb8,
    /// Shade segments along each stroke to suggest thread sheen. Geometry is unaffected.
    pub fancy: bool,
    /// Opaque fill painted before the strokes. `None` keeps the backend's transparent clear.
    pub raster_fill: Option<Rgb8>,
    /// Largest canvas edge the rasterizer will allocate.
    pub max_canvas_edge: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            padding: 50,
            default_stitch_color: Rgb8::BLACK,
            fancy: true,
            raster_fill: None,
            max_canvas_edge: 16_384,
        }
    }
}

impl RasterOptions {
    /// Effective per-edge canvas limit: `max_canvas_edge`, never above what the backend addresses.
    pub fn canvas_limit(&self) -> u32 {
        self.max_canvas_edge.min(u32::from(u16::MAX))
    }

    /// Pixels left for the scaled pattern on each axis once padding is taken out.
    pub fn drawable_extent(&self) -> f64 {
        f64::from(self.canvas_limit()) - 2.0 * f64::from(self.padding)
    }
}

/// Why rasterization did not produce an image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The pattern has no stitch points to draw.
    #[error("pattern has no stitch points")]
    NoStitches,
    /// The scaled canvas exceeds what the backend will allocate.
    #[error("canvas {width}x{height} exceeds the raster limit of {limit}px per edge")]
    CanvasTooLarge {
        /// Requested width.
        width: u64,
        /// Requested height.
        height: u64,
        /// Configured per-edge limit.
        limit: u32,
    },
    /// The render was superseded before it finished.
    #[error("rasterization cancelled")]
    Cancelled,
    /// Any other drawing backend failure.
    #[error("raster backend error: {0}")]
    Backend(String),
}

/// A stroke rasterizer for stitch patterns.
///
/// The pipeline is written against this trait so sessions and workers can swap in alternative
/// (or instrumented) backends.
pub trait RasterBackend: Send {
    /// Draw `pattern` at `choice` into a new image.
    fn rasterize(
        &mut self,
        pattern: &Pattern,
        choice: ScaleChoice,
        opts: &RasterOptions,
        cancel: &CancelToken,
    ) -> Result<RasterImage, RasterError>;
}

/// CPU rasterizer powered by `vello_cpu`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuRasterizer;

impl CpuRasterizer {
    /// Create a CPU rasterizer.
    pub fn new() -> Self {
        Self
    }
}

impl RasterBackend for CpuRasterizer {
    fn rasterize(
        &mut self,
        pattern: &Pattern,
        choice: ScaleChoice,
        opts: &RasterOptions,
        cancel: &CancelToken,
    ) -> Result<RasterImage, RasterError> {
        rasterize(pattern, choice, opts, cancel)
    }
}

/// Canvas size and translation for a pattern at a given scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Translation applied to scaled coordinates.
    pub offset_x: f64,
    /// Translation applied to scaled coordinates.
    pub offset_y: f64,
}

/// Compute the padded canvas for `pattern` at `scale`.
pub fn canvas_layout(
    pattern: &Pattern,
    scale: f64,
    opts: &RasterOptions,
) -> Result<CanvasLayout, RasterError> {
    let b = pattern.bounds().ok_or(RasterError::NoStitches)?;
    let pad = f64::from(opts.padding);
    let edge = |extent: f64| -> f64 { ((extent * scale).ceil() + 2.0 * pad).max(1.0) };
    let (w, h) = (edge(b.width()), edge(b.height()));
    let limit = f64::from(opts.canvas_limit());
    if !w.is_finite() || !h.is_finite() || w > limit || h > limit {
        return Err(RasterError::CanvasTooLarge {
            width: if w.is_finite() { w as u64 } else { u64::MAX },
            height: if h.is_finite() { h as u64 } else { u64::MAX },
            limit: opts.max_canvas_edge,
        });
    }
    Ok(CanvasLayout {
        width: w as u32,
        height: h as u32,
        offset_x: pad - b.min_x * scale,
        offset_y: pad - b.min_y * scale,
    })
}

/// Rasterize `pattern` with the CPU backend.
///
/// Consecutive `Stitch` commands form one polyline; a lone stitch is drawn as a dot. Any other
/// command ends the current polyline without a connecting segment, and a `Jump` target becomes
/// the start point of the next one. `ColorChange` advances the palette index (clamped to the last
/// thread). `End` stops drawing.
pub fn rasterize(
    pattern: &Pattern,
    choice: ScaleChoice,
    opts: &RasterOptions,
    cancel: &CancelToken,
) -> Result<RasterImage, RasterError> {
    let scaled = pattern.scaled(choice.scale);
    let layout = canvas_layout(pattern, choice.scale, opts)?;
    let w16 = u16::try_from(layout.width)
        .map_err(|_| RasterError::Backend("canvas width exceeds u16".to_string()))?;
    let h16 = u16::try_from(layout.height)
        .map_err(|_| RasterError::Backend("canvas height exceeds u16".to_string()))?;

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    if let Some(fill) = opts.raster_fill {
        ctx.set_paint(to_cpu_color(fill));
        ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(layout.width),
            f64::from(layout.height),
        ));
    }
    ctx.set_stroke(
        Stroke::new(f64::from(choice.line_width))
            .with_caps(Cap::Round)
            .with_join(Join::Round),
    );

    let mut painter = StrokePainter {
        ctx: &mut ctx,
        pattern,
        opts,
        line_width: f64::from(choice.line_width),
        color_index: 0,
        anchor: None,
        points: Vec::new(),
    };
    for cmd in scaled.stitches() {
        let p = Point::new(cmd.x + layout.offset_x, cmd.y + layout.offset_y);
        match cmd.kind {
            StitchKind::Stitch => painter.stitch(p),
            StitchKind::End => break,
            StitchKind::ColorChange => {
                painter.flush(cancel)?;
                painter.color_index += 1;
            }
            StitchKind::Jump => {
                painter.flush(cancel)?;
                painter.anchor = Some(p);
            }
            StitchKind::Trim | StitchKind::Stop | StitchKind::SequenceBreak => {
                painter.flush(cancel)?;
            }
        }
    }
    painter.flush(cancel)?;

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(RasterImage {
        width: layout.width,
        height: layout.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        has_alpha: opts.raster_fill.is_none(),
    })
}

/// Resolve the thread color for `color_index`, clamping past the end of the palette.
pub fn thread_color(pattern: &Pattern, color_index: usize, fallback: Rgb8) -> Rgb8 {
    let threads = pattern.threads();
    match threads.len() {
        0 => fallback,
        n => threads[color_index.min(n - 1)].color,
    }
}

const DOT_TOLERANCE: f64 = 0.1;

struct StrokePainter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    pattern: &'a Pattern,
    opts: &'a RasterOptions,
    line_width: f64,
    color_index: usize,
    anchor: Option<Point>,
    points: Vec<Point>,
}

impl StrokePainter<'_> {
    fn stitch(&mut self, p: Point) {
        if self.points.is_empty()
            && let Some(a) = self.anchor.take()
        {
            self.points.push(a);
        }
        self.points.push(p);
    }

    fn flush(&mut self, cancel: &CancelToken) -> Result<(), RasterError> {
        if cancel.is_cancelled() {
            return Err(RasterError::Cancelled);
        }
        self.anchor = None;
        let points = std::mem::take(&mut self.points);
        if points.is_empty() {
            return Ok(());
        }
        let base = thread_color(self.pattern, self.color_index, self.opts.default_stitch_color);
        if points.len() == 1 {
            let r = (self.line_width / 2.0).max(0.5);
            self.ctx.set_paint(to_cpu_color(base));
            self.ctx
                .fill_path(&Circle::new(points[0], r).to_path(DOT_TOLERANCE));
            return Ok(());
        }
        if self.opts.fancy {
            let n = points.len() - 1;
            for (i, seg) in points.windows(2).enumerate() {
                self.ctx.set_paint(to_cpu_color(base.shade(sheen(i, n))));
                let mut path = BezPath::new();
                path.move_to(seg[0]);
                path.line_to(seg[1]);
                self.ctx.stroke_path(&path);
            }
        } else {
            self.ctx.set_paint(to_cpu_color(base));
            let mut path = BezPath::new();
            path.move_to(points[0]);
            for &p in &points[1..] {
                path.line_to(p);
            }
            self.ctx.stroke_path(&path);
        }
        Ok(())
    }
}

/// Shade amount for segment `i` of `n`: darker at the ends, lighter in the middle.
fn sheen(i: usize, n: usize) -> f32 {
    let t = (i as f32 + 0.5) / n.max(1) as f32;
    0.35 * (std::f32::consts::PI * t).sin() - 0.15
}

fn to_cpu_color(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
