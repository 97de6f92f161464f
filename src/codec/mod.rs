//! Pattern file formats.
//!
//! A [`FormatRegistry`](registry::FormatRegistry) maps file extensions to codecs. Built-in codecs
//! cover a JSON interchange document and a write-only PNG preview.

/// File-dialog filter strings and export naming.
pub mod dialog;
/// JSON pattern documents.
pub mod json;
/// PNG preview export.
pub mod png;
/// Codec trait and extension registry.
pub mod registry;
