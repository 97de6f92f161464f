//! Conversions between the pattern's native length unit and display units.
//!
//! Patterns store coordinates in tenths of a millimetre (`mm10`). All functions here are pure.

use crate::pattern::model::Bounds;

/// Tenths of a millimetre per centimetre.
pub const MM10_PER_CM: f64 = 100.0;
/// Tenths of a millimetre per millimetre.
pub const MM10_PER_MM: f64 = 10.0;
/// Tenths of a millimetre per inch.
pub const MM10_PER_INCH: f64 = 254.0;

/// Convert tenths of a millimetre to centimetres.
pub fn mm10_to_cm(v: f64) -> f64 {
    v / MM10_PER_CM
}

/// Convert centimetres to tenths of a millimetre.
pub fn cm_to_mm10(v: f64) -> f64 {
    v * MM10_PER_CM
}

/// Convert tenths of a millimetre to millimetres.
pub fn mm10_to_mm(v: f64) -> f64 {
    v / MM10_PER_MM
}

/// Convert tenths of a millimetre to inches.
pub fn mm10_to_inches(v: f64) -> f64 {
    v / MM10_PER_INCH
}

/// Physical `(width_cm, height_cm)` of a pattern's bounds.
///
/// Returns `None` for patterns without stitches (no bounds).
pub fn size_cm(bounds: Option<Bounds>) -> Option<(f64, f64)> {
    let b = bounds?;
    Some((mm10_to_cm(b.width()), mm10_to_cm(b.height())))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/units.rs"]
mod tests;
