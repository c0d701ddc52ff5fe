//! Backlang decoder

use crate::error::{Error, Result};
use crate::lines::{LineSequence, LITERAL_GUARD, NO_NEWLINE_MARKER};
use std::path::Path;
use tracing::{debug, info};

/// Undoes [`Encoder`](crate::Encoder): strips the marker, restores line order
pub struct Decoder {
    // Currently stateless, but reserved for future options
}

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self {}
    }

    /// Decode a buffer.
    ///
    /// Sentinels are only recognized as the very first record. Anything else,
    /// including a marker-looking line further down, is ordinary content.
    /// A leading `##BCKL.LIT##` record is always treated as a guard, so a
    /// plain-format artifact that happens to start with that line loses it.
    pub fn decode(&self, input: &[u8]) -> Vec<u8> {
        let mut lines = LineSequence::split(input);

        let had_marker = lines.take_leading(NO_NEWLINE_MARKER);
        if !had_marker && lines.take_leading(LITERAL_GUARD) {
            debug!("dropped literal guard");
        }

        lines.reverse();

        if had_marker && lines.strip_last_terminator() {
            debug!(records = lines.len(), "restored missing trailing newline");
        }

        lines.join()
    }

    /// Decode a buffer directly to a writer
    pub fn decode_to_writer<W: std::io::Write>(&self, input: &[u8], mut writer: W) -> Result<()> {
        let decoded = self.decode(input);
        writer.write_all(&decoded)?;
        Ok(())
    }

    /// Read `source` and return its decoded bytes
    pub fn decode_source(&self, source: &Path) -> Result<Vec<u8>> {
        let data = std::fs::read(source).map_err(|e| Error::from_io(e, source))?;
        Ok(self.decode(&data))
    }

    /// Write already decoded bytes to `output`
    pub fn write_decoded(&self, output: &Path, decoded: &[u8]) -> Result<()> {
        std::fs::write(output, decoded).map_err(|e| Error::from_io(e, output))?;
        info!(output = %output.display(), bytes = decoded.len(), "decoded file written");
        Ok(())
    }

    /// Decode `source` and write the result to `output`.
    ///
    /// `output` is written unconditionally; collision handling is the
    /// caller's job (see [`naming::resolve_output`](crate::naming::resolve_output)).
    pub fn decode_file(&self, source: &Path, output: &Path) -> Result<()> {
        let decoded = self.decode_source(source)?;
        self.write_decoded(output, &decoded)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
