//! In-memory embroidery pattern model.

/// Commands, threads, bounds and the [`Pattern`](model::Pattern) container.
pub mod model;
