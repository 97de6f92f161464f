use crate::pattern::model::Pattern;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5f1c_7e3a_9b24_d801;

/// Content key for a loaded pattern, used by the single-slot render cache.
///
/// Only the command count, the stitch bounds and the palette size are hashed. Two patterns that
/// agree on all three (for example a recolored thread or a moved interior stitch) share a
/// fingerprint; callers that mutate a pattern in place must invalidate the cache themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatternFingerprint {
    /// High 64 bits of the digest.
    pub hi: u64,
    /// Low 64 bits of the digest.
    pub lo: u64,
}

/// Compute the fingerprint of `pattern`.
pub fn fingerprint_pattern(pattern: &Pattern) -> PatternFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(pattern.len() as u64);
    match pattern.bounds() {
        Some(b) => {
            h.write_u8(1);
            h.write_f64(b.min_x);
            h.write_f64(b.min_y);
            h.write_f64(b.max_x);
            h.write_f64(b.max_y);
        }
        None => h.write_u8(0),
    }
    h.write_u64(pattern.threads().len() as u64);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        // Fold -0.0 into 0.0 so equal bounds hash equally.
        let v = if v == 0.0 { 0.0 } else { v };
        self.write_u64(v.to_bits());
    }

    fn finish(self) -> PatternFingerprint {
        let v = self.inner.digest128();
        PatternFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fingerprint.rs"]
mod tests;
