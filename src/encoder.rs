//! Backlang encoder

use crate::error::{Error, Result};
use crate::lines::{LineRecord, LineSequence, LITERAL_GUARD, NO_NEWLINE_MARKER};
use crate::naming;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reverses line order and marks a missing trailing newline
pub struct Encoder {
    // Currently stateless, but reserved for future options
}

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {}
    }

    /// Encode a buffer
    pub fn encode(&self, input: &[u8]) -> Vec<u8> {
        let mut lines = LineSequence::split(input);
        lines.reverse();

        if !input.is_empty() && !lines.had_trailing_terminator() {
            debug!(records = lines.len(), "source lacks trailing newline, adding marker");
            lines.push_front(LineRecord::borrowed(NO_NEWLINE_MARKER));
        } else if Self::needs_guard(&lines) {
            // Original last line reads like a sentinel; keep the decoder from eating it
            debug!("leading record collides with a sentinel, adding literal guard");
            lines.push_front(LineRecord::borrowed(LITERAL_GUARD));
        }

        lines.join()
    }

    fn needs_guard(lines: &LineSequence<'_>) -> bool {
        lines
            .first()
            .map(|record| {
                record.as_bytes() == NO_NEWLINE_MARKER || record.as_bytes() == LITERAL_GUARD
            })
            .unwrap_or(false)
    }

    /// Encode a buffer directly to a writer
    pub fn encode_to_writer<W: std::io::Write>(&self, input: &[u8], mut writer: W) -> Result<()> {
        let encoded = self.encode(input);
        writer.write_all(&encoded)?;
        Ok(())
    }

    /// Encode `source` into `<source>.bck`, returning the artifact path.
    ///
    /// An existing artifact is overwritten.
    pub fn encode_file(&self, source: &Path) -> Result<PathBuf> {
        let data = std::fs::read(source).map_err(|e| Error::from_io(e, source))?;
        let output = naming::encoded_path(source);

        let encoded = self.encode(&data);
        std::fs::write(&output, &encoded).map_err(|e| Error::from_io(e, &output))?;

        info!(
            source = %source.display(),
            output = %output.display(),
            bytes = encoded.len(),
            "encoded file"
        );
        Ok(output)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
