use crate::codec::json::JsonCodec;
use crate::codec::png::PngCodec;
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::pattern::model::Pattern;
use std::io::Write;
use std::path::Path;

/// Capabilities of one registered format.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FormatInfo {
    /// Lowercase extension without the dot.
    pub extension: String,
    /// Human readable name shown in file dialogs.
    pub description: String,
    /// Whether patterns can be read from this format.
    pub can_read: bool,
    /// Whether patterns can be written to this format.
    pub can_write: bool,
}

/// A reader and/or writer for one file format.
///
/// Both directions default to an "unsupported" error so write-only or read-only codecs only
/// implement what they support.
pub trait PatternCodec: Send + Sync {
    /// Extension, description and capabilities.
    fn info(&self) -> FormatInfo;

    /// Decode a pattern from file contents.
    fn read(&self, _bytes: &[u8]) -> PreviewResult<Pattern> {
        Err(PreviewError::decode(format!(
            "format '{}' cannot be read",
            self.info().extension
        )))
    }

    /// Encode `pattern` into `out`.
    fn write(&self, _pattern: &Pattern, _out: &mut dyn Write) -> PreviewResult<()> {
        Err(PreviewError::encode(format!(
            "format '{}' cannot be written",
            self.info().extension
        )))
    }
}

/// Extension-keyed set of codecs, in registration order.
#[derive(Default)]
pub struct FormatRegistry {
    codecs: Vec<Box<dyn PatternCodec>>,
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.list_formats()).finish()
    }
}

impl FormatRegistry {
    /// A registry without any formats.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in JSON and PNG codecs.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(Box::new(JsonCodec));
        reg.register(Box::new(PngCodec::default()));
        reg
    }

    /// Add a codec. A later codec for the same extension shadows the earlier one.
    pub fn register(&mut self, codec: Box<dyn PatternCodec>) {
        self.codecs.push(codec);
    }

    /// Every registered format, in registration order.
    pub fn list_formats(&self) -> Vec<FormatInfo> {
        self.codecs.iter().map(|c| c.info()).collect()
    }

    /// The codec registered for `ext` (case-insensitive, leading dot ignored).
    pub fn find(&self, ext: &str) -> Option<&dyn PatternCodec> {
        let ext = normalize_ext(ext);
        self.codecs
            .iter()
            .rev()
            .find(|c| c.info().extension == ext)
            .map(|c| c.as_ref())
    }

    /// Read a pattern, choosing the codec from the file extension.
    #[tracing::instrument(skip(self))]
    pub fn read_path(&self, path: &Path) -> PreviewResult<Pattern> {
        let ext = path_ext(path).ok_or_else(|| {
            PreviewError::decode(format!("'{}' has no file extension", path.display()))
        })?;
        let bytes = std::fs::read(path)?;
        let pattern = self.read_bytes(&bytes, &ext)?;
        tracing::debug!(commands = pattern.len(), "pattern decoded");
        Ok(pattern)
    }

    /// Decode `bytes` as format `ext`.
    pub fn read_bytes(&self, bytes: &[u8], ext: &str) -> PreviewResult<Pattern> {
        let codec = self
            .find(ext)
            .ok_or_else(|| PreviewError::decode(format!("unsupported format '{ext}'")))?;
        if !codec.info().can_read {
            return Err(PreviewError::decode(format!(
                "format '{ext}' is not supported for reading"
            )));
        }
        codec.read(bytes)
    }

    /// Encode `pattern` as format `ext` into memory.
    pub fn write_bytes(&self, pattern: &Pattern, ext: &str) -> PreviewResult<Vec<u8>> {
        let codec = self
            .find(ext)
            .ok_or_else(|| PreviewError::encode(format!("unsupported format '{ext}'")))?;
        if !codec.info().can_write {
            return Err(PreviewError::encode(format!(
                "format '{ext}' is not supported for writing"
            )));
        }
        let mut buf = Vec::new();
        codec.write(pattern, &mut buf)?;
        Ok(buf)
    }

    /// Encode `pattern` and write it to `path`.
    ///
    /// The format is `ext` when given, otherwise the extension of `path`. Nothing is written when
    /// encoding fails.
    #[tracing::instrument(skip(self, pattern))]
    pub fn write_path(&self, pattern: &Pattern, path: &Path, ext: Option<&str>) -> PreviewResult<()> {
        let ext = match ext {
            Some(e) => normalize_ext(e),
            None => path_ext(path).ok_or_else(|| {
                PreviewError::encode(format!("'{}' has no file extension", path.display()))
            })?,
        };
        let bytes = self.write_bytes(pattern, &ext)?;
        std::fs::write(path, bytes)?;
        tracing::debug!(format = %ext, "pattern written");
        Ok(())
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn path_ext(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(normalize_ext)
        .filter(|e| !e.is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/registry.rs"]
mod tests;
