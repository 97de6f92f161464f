use crate::pattern::model::Pattern;
use crate::render::fingerprint::{PatternFingerprint, fingerprint_pattern};
use crate::render::image::PreviewImage;
use std::sync::Arc;

/// Single-slot cache of the last composited preview, keyed by [`PatternFingerprint`].
///
/// `get` and `put` never render. Callers decide when to fill the slot and must call
/// [`RenderCache::invalidate`] when the active pattern is replaced.
#[derive(Clone, Debug, Default)]
pub struct RenderCache {
    slot: Option<CacheEntry>,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    fingerprint: PatternFingerprint,
    image: Arc<PreviewImage>,
}

impl RenderCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached image when its fingerprint matches `pattern`.
    pub fn get(&self, pattern: &Pattern) -> Option<Arc<PreviewImage>> {
        let entry = self.slot.as_ref()?;
        (entry.fingerprint == fingerprint_pattern(pattern)).then(|| Arc::clone(&entry.image))
    }

    /// Store `image` as the rendering of `pattern`, replacing any previous entry.
    pub fn put(&mut self, pattern: &Pattern, image: Arc<PreviewImage>) {
        self.slot = Some(CacheEntry {
            fingerprint: fingerprint_pattern(pattern),
            image,
        });
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
