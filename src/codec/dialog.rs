//! File-dialog helpers for pattern import and export.
//!
//! These build the filter strings and suggested file names a desktop front end hands to its native
//! file dialogs; they do no I/O.

use crate::codec::registry::FormatRegistry;
use std::path::{Path, PathBuf};

/// Filter string offering every readable extension plus a catch-all.
///
/// `"All Supported Embroidery Files (*.a *.b);;All Files (*)"`, extensions sorted and
/// de-duplicated; just `"All Files (*)"` when nothing is readable.
pub fn read_filter_string(registry: &FormatRegistry) -> String {
    let mut exts = registry
        .list_formats()
        .into_iter()
        .filter(|f| f.can_read && !f.extension.is_empty())
        .map(|f| format!("*.{}", f.extension))
        .collect::<Vec<_>>();
    if exts.is_empty() {
        return "All Files (*)".to_string();
    }
    exts.sort();
    exts.dedup();
    format!(
        "All Supported Embroidery Files ({});;All Files (*)",
        exts.join(" ")
    )
}

/// `("Description (*.ext)", "ext")` pairs for every writable format, in registry order.
pub fn write_filters(registry: &FormatRegistry) -> Vec<(String, String)> {
    registry
        .list_formats()
        .into_iter()
        .filter(|f| f.can_write)
        .map(|f| (format!("{} (*.{})", f.description, f.extension), f.extension))
        .collect()
}

/// Extension named by a `"Description (*.ext)"` filter; `None` for `(*)` or malformed filters.
pub fn filter_extension(filter: &str) -> Option<String> {
    let (_, rest) = filter.rsplit_once("(*.")?;
    let (ext, _) = rest.split_once(')')?;
    let ext = ext.trim();
    (!ext.is_empty() && ext != "*").then(|| ext.to_ascii_lowercase())
}

/// Suggested export name: `{stem}_{EXT}.{ext}`.
pub fn export_file_name(stem: &str, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    let stem = if stem.is_empty() { "pattern" } else { stem };
    format!(
        "{stem}_{}.{}",
        ext.to_ascii_uppercase(),
        ext.to_ascii_lowercase()
    )
}

/// `path` with its extension replaced by `ext` unless it already matches (case-insensitive).
pub fn ensure_extension(path: &Path, ext: &str) -> PathBuf {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    let current = path.extension().and_then(|e| e.to_str());
    match current {
        Some(c) if c.eq_ignore_ascii_case(&ext) => path.to_path_buf(),
        _ => path.with_extension(ext),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/dialog.rs"]
mod tests;
