use crate::foundation::color::Rgb8;
use crate::foundation::error::{PreviewError, PreviewResult};
use std::io::Cursor;
use std::path::Path;

/// Raw rasterizer output: premultiplied RGBA8, row-major, tightly packed.
///
/// `has_alpha` is `false` when the rasterizer painted an opaque background fill; the alpha
/// compositor then keys that background out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether the background is already transparent.
    pub has_alpha: bool,
}

/// Displayable preview with a transparent background.
///
/// Pixels are premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl PreviewImage {
    /// An opaque image filled with `color`. Edges are raised to at least one pixel.
    pub fn solid(width: u32, height: u32, color: Rgb8) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let data = color.to_rgba8().repeat((width as usize) * (height as usize));
        Self {
            width,
            height,
            data,
        }
    }

    /// Premultiplied RGBA at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_pixel_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Convert to a straight-alpha `image::RgbaImage`.
    pub fn to_rgba_image(&self) -> PreviewResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| PreviewError::render("preview buffer does not match its dimensions"))
    }

    /// Encode as PNG bytes (straight alpha).
    pub fn encode_png(&self) -> PreviewResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| PreviewError::encode(format!("png encoding failed: {e}")))?;
        Ok(buf)
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: &Path) -> PreviewResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/image.rs"]
mod tests;
