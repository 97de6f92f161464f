/// Result alias used across the crate.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Error type shared by the codec layer, the session API and the CLI.
///
/// Rasterization problems never surface as a `PreviewError` from [`crate::render`]; the pipeline
/// degrades them into a fallback image instead.
#[derive(thiserror::Error, Debug)]
pub enum PreviewError {
    /// Input that is structurally invalid (bad config values, malformed colors, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// A pattern file could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A pattern could not be encoded into the requested format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Rendering could not produce an image (only reported by explicit export paths).
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem failure while reading or writing a pattern.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else, with context attached by the caller.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PreviewError {
    /// A [`PreviewError::Validation`] with `msg`.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// A [`PreviewError::Decode`] with `msg`.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// A [`PreviewError::Encode`] with `msg`.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// A [`PreviewError::Render`] with `msg`.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
