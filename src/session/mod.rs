//! Session-oriented preview API.
//!
//! A [`PreviewSession`](preview_session::PreviewSession) owns the active pattern, the render cache
//! and the last displayed image. A [`RenderWorker`](worker::RenderWorker) moves rasterization off
//! the caller's thread.

/// The explicit preview context object.
pub mod preview_session;
/// Background render thread with stale-result suppression.
pub mod worker;
