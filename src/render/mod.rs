//! Pattern-to-raster pipeline.
//!
//! `select_scale -> cap_to_extent -> rasterize -> composite_alpha`, with a single-slot cache
//! keyed by a pattern fingerprint in front of it.

/// Background keying for rasterizer output.
pub mod alpha;
/// Single-slot render cache.
pub mod cache;
/// Render configuration and its JSON/env loading.
pub mod config;
/// Pattern fingerprints used as cache keys.
pub mod fingerprint;
/// Raster and preview image buffers.
pub mod image;
/// Render entry points.
pub mod pipeline;
/// Stroke rasterization.
pub mod raster;
/// Render scale selection.
pub mod scale;
