use crate::codec::registry::{FormatInfo, PatternCodec};
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::pattern::model::Pattern;
use crate::render::config::RenderConfig;
use crate::render::pipeline::{RenderOutcome, render};
use crate::render::scale::Viewport;
use std::io::Write;

/// Write-only codec that exports the rendered preview as a PNG with a transparent background.
#[derive(Clone, Debug, Default)]
pub struct PngCodec {
    /// Render settings used for export.
    pub config: RenderConfig,
    /// Viewport hint passed to scale selection.
    pub viewport: Viewport,
}

impl PngCodec {
    /// A PNG codec rendering with `config` at the `viewport` hint.
    pub fn new(config: RenderConfig, viewport: Viewport) -> Self {
        Self { config, viewport }
    }
}

impl PatternCodec for PngCodec {
    fn info(&self) -> FormatInfo {
        FormatInfo {
            extension: "png".to_string(),
            description: "PNG Preview Image".to_string(),
            can_read: false,
            can_write: true,
        }
    }

    fn write(&self, pattern: &Pattern, out: &mut dyn Write) -> PreviewResult<()> {
        let rendered = render(pattern, self.viewport, &self.config);
        match rendered.outcome {
            RenderOutcome::Rendered | RenderOutcome::Cached => {}
            RenderOutcome::Empty => {
                return Err(PreviewError::encode("pattern has no stitches to draw"));
            }
            RenderOutcome::Fallback | RenderOutcome::Cancelled => {
                return Err(PreviewError::encode("pattern could not be rasterized"));
            }
        }
        out.write_all(&rendered.image.encode_png()?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/png.rs"]
mod tests;
