//! Render scale selection.
//!
//! Picks a raster resolution from the pattern's physical size and a viewport hint. The result is
//! deliberately not an exact on-screen fit: the view layer performs the final fit with its own
//! transform, so the raster only needs to be "sharp enough" and bounded in memory.

/// Bounds and constants for [`select_scale`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Lower bound for the target raster edge length in pixels.
    pub target_pixels_floor: f64,
    /// Smallest allowed scale (pixels per tenth of a millimetre).
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Scale used when the pattern has no usable extent.
    pub initial_render_scale: f64,
    /// Stroke width as a fraction of the scale.
    pub line_width_factor: f64,
    /// Smallest stroke width in pixels.
    pub min_line_width: u32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            target_pixels_floor: 2000.0,
            min_scale: 2.0,
            max_scale: 60.0,
            initial_render_scale: 8.0,
            line_width_factor: 0.8,
            min_line_width: 2,
        }
    }
}

/// Viewport size hint in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Construct a viewport hint.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The hint with both edges raised to at least one pixel.
    pub fn at_least_one(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }
}

/// Output of [`select_scale`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleChoice {
    /// Pixels per tenth of a millimetre.
    pub scale: f64,
    /// Stroke width in pixels.
    pub line_width: u32,
}

/// Select a render scale and stroke width for a pattern of `width x height` tenths of a mm.
///
/// Never fails: non-positive or non-finite extents fall back to
/// [`ScaleConfig::initial_render_scale`].
pub fn select_scale(width: f64, height: f64, viewport: Viewport, cfg: &ScaleConfig) -> ScaleChoice {
    let target = cfg
        .target_pixels_floor
        .max(2.0 * f64::from(viewport.width))
        .max(2.0 * f64::from(viewport.height));

    let raw = if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        (target / width).min(target / height)
    } else {
        cfg.initial_render_scale
    };

    // min/max rather than clamp: a misconfigured min > max must not panic.
    let scale = raw.max(cfg.min_scale).min(cfg.max_scale);
    ScaleChoice {
        scale,
        line_width: line_width_for(scale, cfg),
    }
}

/// Lower `choice` so a pattern of `width x height` spans at most `max_extent` pixels on its
/// longer axis. The cap may go below [`ScaleConfig::min_scale`]; choices that already fit, and
/// extents with no usable size, are returned unchanged.
pub fn cap_to_extent(
    choice: ScaleChoice,
    width: f64,
    height: f64,
    max_extent: f64,
    cfg: &ScaleConfig,
) -> ScaleChoice {
    let longest = width.max(height);
    if longest <= 0.0 || !longest.is_finite() || max_extent.is_nan() {
        return choice;
    }
    // Half a pixel of slack keeps `ceil(longest * scale)` within `max_extent`.
    let cap = (max_extent.floor() - 0.5) / longest;
    if cap <= 0.0 || choice.scale <= cap {
        return choice;
    }
    ScaleChoice {
        scale: cap,
        line_width: line_width_for(cap, cfg),
    }
}

fn line_width_for(scale: f64, cfg: &ScaleConfig) -> u32 {
    let lw = (scale * cfg.line_width_factor).floor();
    let lw = if lw.is_finite() && lw > 0.0 {
        lw.min(f64::from(u32::MAX)) as u32
    } else {
        0
    };
    lw.max(cfg.min_line_width)
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
