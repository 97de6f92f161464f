use crate::foundation::cancel::CancelToken;
use crate::pattern::model::Pattern;
use crate::render::alpha::composite_alpha;
use crate::render::cache::RenderCache;
use crate::render::config::RenderConfig;
use crate::render::image::PreviewImage;
use crate::render::raster::{CpuRasterizer, RasterBackend, RasterError};
use crate::render::scale::{ScaleChoice, Viewport, cap_to_extent, select_scale};
use std::sync::Arc;

/// How a [`Rendered`] image was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderOutcome {
    /// Freshly rasterized and composited.
    Rendered,
    /// Served from the render cache without rasterizing.
    Cached,
    /// The pattern had no stitches; the image is a viewport-sized background fill.
    Empty,
    /// Rasterization failed; the image is a viewport-sized background fill.
    Fallback,
    /// The render was cancelled; the image is a viewport-sized background fill.
    Cancelled,
}

impl RenderOutcome {
    /// `true` for outcomes that carry an actual drawing of the pattern.
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Rendered | Self::Cached)
    }
}

/// Result of one pass through the pipeline. Rendering never fails; problems degrade the outcome.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// The preview to display.
    pub image: Arc<PreviewImage>,
    /// How `image` was produced.
    pub outcome: RenderOutcome,
    /// Scale used for rasterization; `None` when nothing was rasterized.
    pub scale: Option<ScaleChoice>,
}

/// Render `pattern` with the built-in CPU rasterizer.
///
/// Pipeline:
/// 1. [`select_scale`] from the pattern bounds and the viewport hint
/// 2. [`cap_to_extent`] so the padded canvas stays within the raster limit
/// 3. [`RasterBackend::rasterize`]
/// 4. [`composite_alpha`]
pub fn render(pattern: &Pattern, viewport: Viewport, cfg: &RenderConfig) -> Rendered {
    render_with(
        &mut CpuRasterizer::new(),
        pattern,
        viewport,
        cfg,
        &CancelToken::new(),
    )
}

/// Render through an explicit backend, observing `cancel`.
#[tracing::instrument(
    level = "debug",
    skip(backend, pattern, cfg, cancel),
    fields(commands = pattern.len())
)]
pub fn render_with(
    backend: &mut dyn RasterBackend,
    pattern: &Pattern,
    viewport: Viewport,
    cfg: &RenderConfig,
    cancel: &CancelToken,
) -> Rendered {
    let Some(bounds) = pattern.bounds() else {
        tracing::debug!("pattern has no stitches, returning background");
        return background(viewport, cfg, RenderOutcome::Empty, None);
    };

    let selected = select_scale(bounds.width(), bounds.height(), viewport, &cfg.scale);
    let choice = cap_to_extent(
        selected,
        bounds.width(),
        bounds.height(),
        cfg.raster.drawable_extent(),
        &cfg.scale,
    );
    if choice != selected {
        tracing::debug!(
            selected = selected.scale,
            capped = choice.scale,
            "scale capped to the raster limit"
        );
    }
    tracing::debug!(
        scale = choice.scale,
        line_width = choice.line_width,
        "selected render scale"
    );

    match backend.rasterize(pattern, choice, &cfg.raster, cancel) {
        Ok(raster) => Rendered {
            image: Arc::new(composite_alpha(raster, cfg.key_threshold)),
            outcome: RenderOutcome::Rendered,
            scale: Some(choice),
        },
        Err(RasterError::Cancelled) => {
            tracing::debug!("render cancelled");
            background(viewport, cfg, RenderOutcome::Cancelled, Some(choice))
        }
        Err(e) => {
            tracing::warn!(error = %e, "rasterization failed, showing background fallback");
            background(viewport, cfg, RenderOutcome::Fallback, Some(choice))
        }
    }
}

/// Serve `pattern` from `cache` when possible, otherwise render it and cache the drawing.
///
/// Only [`RenderOutcome::Rendered`] images are stored; empty, fallback and cancelled results are
/// returned without touching the cache.
pub fn render_cached(
    cache: &mut RenderCache,
    backend: &mut dyn RasterBackend,
    pattern: &Pattern,
    viewport: Viewport,
    cfg: &RenderConfig,
    cancel: &CancelToken,
) -> Rendered {
    if let Some(image) = cache.get(pattern) {
        tracing::debug!("render cache hit");
        return Rendered {
            image,
            outcome: RenderOutcome::Cached,
            scale: None,
        };
    }
    let out = render_with(backend, pattern, viewport, cfg, cancel);
    if out.outcome == RenderOutcome::Rendered {
        cache.put(pattern, Arc::clone(&out.image));
    }
    out
}

fn background(
    viewport: Viewport,
    cfg: &RenderConfig,
    outcome: RenderOutcome,
    scale: Option<ScaleChoice>,
) -> Rendered {
    let vp = viewport.at_least_one();
    Rendered {
        image: Arc::new(PreviewImage::solid(vp.width, vp.height, cfg.background)),
        outcome,
        scale,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
