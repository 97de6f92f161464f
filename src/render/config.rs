use crate::foundation::color::Rgb8;
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::render::alpha::DEFAULT_KEY_THRESHOLD;
use crate::render::raster::RasterOptions;
use crate::render::scale::ScaleConfig;
use std::path::Path;

/// Environment variable that toggles fancy (sheen) stroke shading: `0`/`false` or `1`/`true`.
pub const FANCY_ENV: &str = "STITCHVIEW_FANCY";

/// Everything the render pipeline needs besides the pattern and the viewport.
///
/// Deserializes from a partial JSON object; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Scale selection bounds.
    pub scale: ScaleConfig,
    /// Rasterizer options.
    pub raster: RasterOptions,
    /// Fill for empty-pattern and fallback images.
    pub background: Rgb8,
    /// Channel threshold used when keying an opaque raster background.
    pub key_threshold: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: ScaleConfig::default(),
            raster: RasterOptions::default(),
            background: Rgb8::from_u24(0xE0E0E0),
            key_threshold: DEFAULT_KEY_THRESHOLD,
        }
    }
}

impl RenderConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> PreviewResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> PreviewResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| PreviewError::validation(format!("render config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that scale bounds and raster limits are usable.
    pub fn validate(&self) -> PreviewResult<()> {
        let s = &self.scale;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(s.min_scale) || !positive(s.max_scale) || s.min_scale > s.max_scale {
            return Err(PreviewError::validation(
                "scale bounds must be positive and min_scale <= max_scale",
            ));
        }
        if !positive(s.initial_render_scale) || !positive(s.target_pixels_floor) {
            return Err(PreviewError::validation(
                "initial_render_scale and target_pixels_floor must be positive",
            ));
        }
        if !s.line_width_factor.is_finite() || s.line_width_factor < 0.0 {
            return Err(PreviewError::validation(
                "line_width_factor must be non-negative",
            ));
        }
        if self.raster.max_canvas_edge == 0 {
            return Err(PreviewError::validation("max_canvas_edge must be non-zero"));
        }
        Ok(())
    }

    /// Apply overrides from the process environment (see [`FANCY_ENV`]).
    pub fn with_env_overrides(self) -> Self {
        let fancy = std::env::var(FANCY_ENV).ok();
        self.with_fancy_override(fancy.as_deref())
    }

    fn with_fancy_override(mut self, value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") | Some("true") => self.raster.fancy = true,
            Some("0") | Some("false") => self.raster.fancy = false,
            Some(other) => {
                tracing::warn!(value = other, "ignoring unrecognised STITCHVIEW_FANCY value")
            }
            None => {}
        }
        self
    }

    /// Set the empty/fallback fill.
    pub fn with_background(mut self, background: Rgb8) -> Self {
        self.background = background;
        self
    }

    /// Toggle sheen shading.
    pub fn with_fancy(mut self, fancy: bool) -> Self {
        self.raster.fancy = fancy;
        self
    }

    /// Set the raster margin in pixels.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.raster.padding = padding;
        self
    }

    /// Set the stroke color used without a palette.
    pub fn with_stitch_color(mut self, color: Rgb8) -> Self {
        self.raster.default_stitch_color = color;
        self
    }

    /// Set the opaque raster fill (`None` keeps the transparent clear).
    pub fn with_raster_fill(mut self, fill: Option<Rgb8>) -> Self {
        self.raster.raster_fill = fill;
        self
    }

    /// Replace the scale selection bounds.
    pub fn with_scale(mut self, scale: ScaleConfig) -> Self {
        self.scale = scale;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
