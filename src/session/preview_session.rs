use crate::codec::registry::FormatRegistry;
use crate::foundation::cancel::CancelToken;
use crate::foundation::color::Rgb8;
use crate::foundation::error::PreviewResult;
use crate::foundation::units::size_cm;
use crate::pattern::model::{Bounds, Pattern, PatternSummary};
use crate::render::cache::RenderCache;
use crate::render::config::RenderConfig;
use crate::render::image::PreviewImage;
use crate::render::pipeline::{RenderOutcome, Rendered, render_cached, render_with};
use crate::render::raster::{CpuRasterizer, RasterBackend};
use crate::render::scale::Viewport;
use crate::session::worker::{RenderJob, RenderResult, RenderWorker};
use std::path::Path;
use std::sync::Arc;

/// Counters for renders served by a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Images produced by the rasterizer.
    pub rasterized: u64,
    /// Images served from the cache.
    pub cache_hits: u64,
    /// Background images for missing or stitchless patterns.
    pub empty: u64,
    /// Background images after a rasterization failure.
    pub fallbacks: u64,
}

impl SessionStats {
    fn record(&mut self, outcome: RenderOutcome) {
        match outcome {
            RenderOutcome::Rendered => self.rasterized += 1,
            RenderOutcome::Cached => self.cache_hits += 1,
            RenderOutcome::Empty => self.empty += 1,
            RenderOutcome::Fallback => self.fallbacks += 1,
            RenderOutcome::Cancelled => {}
        }
    }
}

/// Explicit context for previewing one pattern at a time.
///
/// Owns the active pattern, the render cache and the last produced image. Loading a pattern
/// replaces it and invalidates the cache in one `&mut self` step, so a cached image can never
/// outlive the pattern it was drawn from.
pub struct PreviewSession {
    config: RenderConfig,
    backend: Box<dyn RasterBackend>,
    pattern: Option<Arc<Pattern>>,
    cache: RenderCache,
    image: Option<Arc<PreviewImage>>,
    pending: Option<u64>,
    stats: SessionStats,
}

impl std::fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("config", &self.config)
            .field("loaded", &self.pattern.is_some())
            .field("cached", &!self.cache.is_empty())
            .field("pending", &self.pending)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl PreviewSession {
    /// A session rendering with the CPU rasterizer.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_backend(config, Box::new(CpuRasterizer::new()))
    }

    /// A session rendering through `backend`.
    pub fn with_backend(config: RenderConfig, backend: Box<dyn RasterBackend>) -> Self {
        Self {
            config,
            backend,
            pattern: None,
            cache: RenderCache::new(),
            image: None,
            pending: None,
            stats: SessionStats::default(),
        }
    }

    /// Current render settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the render settings. Cached images are dropped.
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
        self.cache.invalidate();
    }

    /// Change the fill used for empty and fallback images.
    pub fn set_background(&mut self, background: Rgb8) {
        self.config.background = background;
    }

    /// Make `pattern` the active pattern.
    ///
    /// A background render still in flight is orphaned, not stopped; call
    /// [`PreviewSession::cancel_background`] first to stop it.
    pub fn load(&mut self, pattern: Pattern) -> Arc<Pattern> {
        let pattern = Arc::new(pattern);
        self.pattern = Some(Arc::clone(&pattern));
        self.cache.invalidate();
        self.image = None;
        self.pending = None;
        tracing::debug!(commands = pattern.len(), "pattern loaded");
        pattern
    }

    /// Decode `path` and load it. On failure the session is left with no pattern.
    pub fn load_path(&mut self, registry: &FormatRegistry, path: &Path) -> PreviewResult<PatternSummary> {
        match registry.read_path(path) {
            Ok(pattern) => Ok(self.load(pattern).summary()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load pattern");
                self.unload();
                Err(e)
            }
        }
    }

    /// Drop the active pattern, the cache and the last image.
    pub fn unload(&mut self) {
        self.pattern = None;
        self.cache.invalidate();
        self.image = None;
        self.pending = None;
    }

    /// The active pattern.
    pub fn pattern(&self) -> Option<&Arc<Pattern>> {
        self.pattern.as_ref()
    }

    /// `true` when a pattern is loaded.
    pub fn is_loaded(&self) -> bool {
        self.pattern.is_some()
    }

    /// Render the active pattern synchronously, serving from the cache when possible.
    ///
    /// Without a pattern this yields a viewport-sized background image.
    pub fn render(&mut self, viewport: Viewport) -> Rendered {
        let cancel = CancelToken::new();
        let out = match &self.pattern {
            Some(p) => render_cached(
                &mut self.cache,
                self.backend.as_mut(),
                p,
                viewport,
                &self.config,
                &cancel,
            ),
            None => render_with(
                self.backend.as_mut(),
                &Pattern::new(),
                viewport,
                &self.config,
                &cancel,
            ),
        };
        self.pending = None;
        self.stats.record(out.outcome);
        self.image = Some(Arc::clone(&out.image));
        out
    }

    /// Start rendering on `worker`.
    ///
    /// Returns the image immediately when no rasterization is needed (no pattern, or a cache hit);
    /// otherwise `None`, and the result must be handed back through [`PreviewSession::accept`].
    pub fn render_in_background(
        &mut self,
        worker: &mut RenderWorker,
        viewport: Viewport,
    ) -> PreviewResult<Option<Rendered>> {
        let Some(pattern) = self.pattern.clone() else {
            worker.cancel();
            return Ok(Some(self.render(viewport)));
        };
        if self.cache.get(&pattern).is_some() {
            worker.cancel();
            return Ok(Some(self.render(viewport)));
        }
        let generation = worker.submit(RenderJob {
            pattern,
            viewport,
            config: self.config.clone(),
        })?;
        self.pending = Some(generation);
        Ok(None)
    }

    /// Cancel the outstanding background render on `worker`, if any.
    pub fn cancel_background(&mut self, worker: &mut RenderWorker) {
        if self.pending.take().is_some() {
            tracing::debug!(generation = worker.generation(), "background render cancelled");
            worker.cancel();
        }
    }

    /// Install a background result. Returns `false` for results that no longer match the session.
    pub fn accept(&mut self, result: RenderResult) -> bool {
        let current = self
            .pattern
            .as_ref()
            .is_some_and(|p| Arc::ptr_eq(p, &result.pattern));
        if self.pending != Some(result.generation) || !current {
            return false;
        }
        self.pending = None;
        let outcome = result.rendered.outcome;
        if outcome == RenderOutcome::Cancelled {
            return false;
        }
        if outcome == RenderOutcome::Rendered {
            self.cache
                .put(&result.pattern, Arc::clone(&result.rendered.image));
        }
        self.stats.record(outcome);
        self.image = Some(result.rendered.image);
        true
    }

    /// `true` while a background render is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Stitch bounds of the active pattern.
    pub fn bounds(&self) -> Option<Bounds> {
        self.pattern.as_ref().and_then(|p| p.bounds())
    }

    /// Physical size of the active pattern in centimetres.
    pub fn size_cm(&self) -> Option<(f64, f64)> {
        size_cm(self.bounds())
    }

    /// Counts and size of the active pattern.
    pub fn summary(&self) -> Option<PatternSummary> {
        self.pattern.as_ref().map(|p| p.summary())
    }

    /// Drop the cached image so the next render rasterizes again.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }

    /// The last image produced or accepted.
    pub fn image(&self) -> Option<Arc<PreviewImage>> {
        self.image.clone()
    }

    /// Render counters.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview_session.rs"]
mod tests;
