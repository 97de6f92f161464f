//! Stitchview renders machine embroidery patterns into preview images.
//!
//! A pattern is an ordered stream of stitch commands in tenths of a millimetre. The render
//! pipeline picks a raster scale from the pattern size and a viewport hint, draws the stitches as
//! stroked polylines, keys the background out to transparency and caches the result:
//!
//! - Build or decode a [`Pattern`] (see [`FormatRegistry`])
//! - Render it with [`render`], or keep it in a [`PreviewSession`]
//! - Move renders off the caller's thread with a [`RenderWorker`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Pattern file formats.
pub mod codec;
/// Pattern model.
pub mod pattern;
/// Render pipeline.
pub mod render;
/// Session-oriented preview API.
pub mod session;
/// Viewport mapping.
pub mod view;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::color::Rgb8;
pub use crate::foundation::error::{PreviewError, PreviewResult};
pub use crate::foundation::units;

pub use crate::codec::registry::{FormatInfo, FormatRegistry, PatternCodec};
pub use crate::pattern::model::{
    Bounds, Pattern, PatternSummary, StitchCommand, StitchKind, ThreadEntry,
};
pub use crate::render::config::RenderConfig;
pub use crate::render::image::{PreviewImage, RasterImage};
pub use crate::render::pipeline::{RenderOutcome, Rendered, render, render_with};
pub use crate::render::raster::{CpuRasterizer, RasterBackend, RasterError, RasterOptions};
pub use crate::render::scale::{ScaleChoice, ScaleConfig, Viewport, cap_to_extent, select_scale};
pub use crate::session::preview_session::{PreviewSession, SessionStats};
pub use crate::session::worker::{RenderJob, RenderResult, RenderWorker};
pub use crate::view::transform::{ViewConfig, ViewTransform, ZoomThrottle};
