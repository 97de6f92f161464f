//! Mapping a rendered preview into a viewport: fit, zoom around a point, rotate.

/// View transform state and zoom throttling.
pub mod transform;
