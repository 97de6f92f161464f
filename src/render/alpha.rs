use crate::render::image::{PreviewImage, RasterImage};
use rayon::prelude::*;

/// Channel value above which a pixel counts as background (on all three channels).
pub const DEFAULT_KEY_THRESHOLD: u8 = 240;

/// Turn rasterizer output into a preview with a transparent background.
///
/// Images that already carry alpha pass through untouched. Opaque images are keyed in one pass:
/// near-white pixels become fully transparent, every other pixel becomes fully opaque with its RGB
/// unchanged. Dimensions never change and the operation is idempotent.
pub fn composite_alpha(raster: RasterImage, threshold: u8) -> PreviewImage {
    let RasterImage {
        width,
        height,
        mut data,
        has_alpha,
    } = raster;
    if !has_alpha {
        key_background_in_place(&mut data, width, threshold);
    }
    PreviewImage {
        width,
        height,
        data,
    }
}

/// Key near-white (and already transparent) pixels to `[0, 0, 0, 0]`, force the rest opaque.
///
/// Rows are processed in parallel; each row is a single linear pass.
pub fn key_background_in_place(rgba: &mut [u8], width: u32, threshold: u8) {
    let row_bytes = (width as usize).max(1) * 4;
    rgba.par_chunks_mut(row_bytes).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            key_px(px, threshold);
        }
    });
}

fn key_px(px: &mut [u8], threshold: u8) {
    let background =
        px[3] == 0 || (px[0] > threshold && px[1] > threshold && px[2] > threshold);
    if background {
        px.fill(0);
    } else {
        px[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/alpha.rs"]
mod tests;
