use crate::codec::registry::{FormatInfo, PatternCodec};
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::pattern::model::{Pattern, StitchCommand, ThreadEntry};
use std::io::Write;

/// Pretty-printed JSON document with a thread palette and the command stream.
///
/// ```json
/// { "threads": [{ "color": "#ff0000", "description": "red" }],
///   "stitches": [{ "x": 0.0, "y": 0.0, "kind": "stitch" }] }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

#[derive(serde::Serialize, serde::Deserialize)]
struct PatternDocument {
    #[serde(default)]
    threads: Vec<ThreadEntry>,
    #[serde(default)]
    stitches: Vec<StitchCommand>,
}

impl PatternCodec for JsonCodec {
    fn info(&self) -> FormatInfo {
        FormatInfo {
            extension: "json".to_string(),
            description: "Stitchview JSON Pattern".to_string(),
            can_read: true,
            can_write: true,
        }
    }

    fn read(&self, bytes: &[u8]) -> PreviewResult<Pattern> {
        let doc: PatternDocument = serde_json::from_slice(bytes)
            .map_err(|e| PreviewError::decode(format!("invalid pattern json: {e}")))?;
        Ok(Pattern::from_parts(doc.stitches, doc.threads))
    }

    fn write(&self, pattern: &Pattern, out: &mut dyn Write) -> PreviewResult<()> {
        let doc = PatternDocument {
            threads: pattern.threads().to_vec(),
            stitches: pattern.stitches().to_vec(),
        };
        serde_json::to_writer_pretty(&mut *out, &doc)
            .map_err(|e| PreviewError::encode(format!("pattern json: {e}")))?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/json.rs"]
mod tests;
