//! Line records and the line splitter

use std::borrow::Cow;

// Backlang format constants
pub const ENCODED_SUFFIX: &str = ".bck";
pub const NO_NEWLINE_MARKER: &[u8] = b"##BCKL.NNL##\n";
pub const LITERAL_GUARD: &[u8] = b"##BCKL.LIT##\n";

/// The only terminator byte. A CR before it stays part of the record.
pub const LINE_FEED: u8 = b'\n';

/// One logical line including its original terminator bytes.
///
/// Records borrow from the buffer they were split from. The only owned
/// record is the one produced for an unterminated final line, which gets a
/// synthetic LF appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> LineRecord<'a> {
    /// Wrap bytes that already end in their original terminator
    pub fn borrowed(bytes: &'a [u8]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
        }
    }

    /// Copy an unterminated line and append the synthetic LF
    fn terminated(bytes: &[u8]) -> Self {
        let mut owned = Vec::with_capacity(bytes.len() + 1);
        owned.extend_from_slice(bytes);
        owned.push(LINE_FEED);
        Self {
            bytes: Cow::Owned(owned),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether this record ends with a line feed
    pub fn is_terminated(&self) -> bool {
        self.bytes.last() == Some(&LINE_FEED)
    }

    /// Drop one trailing LF, if present.
    ///
    /// Returns `true` when a byte was removed.
    pub fn strip_terminator(&mut self) -> bool {
        if !self.is_terminated() {
            return false;
        }
        match &mut self.bytes {
            Cow::Borrowed(slice) => {
                let whole: &'a [u8] = *slice;
                *slice = &whole[..whole.len() - 1];
            }
            Cow::Owned(vec) => {
                vec.pop();
            }
        }
        true
    }
}

/// Ordered line records plus whether the source ended in a terminator.
///
/// Concatenating the records reproduces the source, except that an
/// unterminated final line carries a synthetic LF. `had_trailing_terminator`
/// records that fact so it can be serialized separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence<'a> {
    records: Vec<LineRecord<'a>>,
    had_trailing_terminator: bool,
}

impl<'a> LineSequence<'a> {
    /// Split a buffer into records, keeping every terminator as found.
    ///
    /// An empty buffer yields an empty sequence.
    pub fn split(buffer: &'a [u8]) -> Self {
        let mut records = Vec::new();
        let mut start = 0;

        for (i, &byte) in buffer.iter().enumerate() {
            if byte == LINE_FEED {
                records.push(LineRecord::borrowed(&buffer[start..=i]));
                start = i + 1;
            }
        }

        if start < buffer.len() {
            records.push(LineRecord::terminated(&buffer[start..]));
        }

        Self {
            records,
            had_trailing_terminator: buffer.last() == Some(&LINE_FEED),
        }
    }

    pub fn records(&self) -> &[LineRecord<'a>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the split buffer ended in a line feed
    pub fn had_trailing_terminator(&self) -> bool {
        self.had_trailing_terminator
    }

    /// The first record, if any
    pub fn first(&self) -> Option<&LineRecord<'a>> {
        self.records.first()
    }

    /// Remove the first record if it is byte-equal to `content`
    pub fn take_leading(&mut self, content: &[u8]) -> bool {
        let matched = self
            .records
            .first()
            .map(|record| record.as_bytes() == content)
            .unwrap_or(false);
        if matched {
            self.records.remove(0);
        }
        matched
    }

    /// Insert a record at the front
    pub fn push_front(&mut self, record: LineRecord<'a>) {
        self.records.insert(0, record);
    }

    /// Reverse record order in place
    pub fn reverse(&mut self) {
        self.records.reverse();
    }

    /// Strip the terminator from the last record
    pub fn strip_last_terminator(&mut self) -> bool {
        self.records
            .last_mut()
            .map(LineRecord::strip_terminator)
            .unwrap_or(false)
    }

    /// Concatenate all records in their current order
    pub fn join(&self) -> Vec<u8> {
        let total = self.records.iter().map(LineRecord::len).sum();
        let mut out = Vec::with_capacity(total);
        for record in &self.records {
            out.extend_from_slice(record.as_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents<'a>(seq: &'a LineSequence<'_>) -> Vec<&'a [u8]> {
        seq.records().iter().map(LineRecord::as_bytes).collect()
    }

    #[test]
    fn test_split_empty() {
        let seq = LineSequence::split(b"");
        assert!(seq.is_empty());
        assert!(!seq.had_trailing_terminator());
    }

    #[test]
    fn test_split_single_line_no_newline() {
        let seq = LineSequence::split(b"hello");
        assert_eq!(contents(&seq), vec![&b"hello\n"[..]]);
        assert!(!seq.had_trailing_terminator());
    }

    #[test]
    fn test_split_single_line_with_lf() {
        let seq = LineSequence::split(b"hello\n");
        assert_eq!(contents(&seq), vec![&b"hello\n"[..]]);
        assert!(seq.had_trailing_terminator());
    }

    #[test]
    fn test_split_multiple_lines_no_final_newline() {
        let seq = LineSequence::split(b"a\nb\nc");
        assert_eq!(contents(&seq), vec![&b"a\n"[..], &b"b\n"[..], &b"c\n"[..]]);
    }

    #[test]
    fn test_split_keeps_crlf() {
        let seq = LineSequence::split(b"a\r\nb\nc\r\n");
        assert_eq!(contents(&seq), vec![&b"a\r\n"[..], &b"b\n"[..], &b"c\r\n"[..]]);
    }

    #[test]
    fn test_split_only_terminators() {
        let seq = LineSequence::split(b"\n\n\n");
        assert_eq!(seq.len(), 3);
        assert!(seq.records().iter().all(|r| r.as_bytes() == b"\n"));
    }

    #[test]
    fn test_split_lone_cr_is_content() {
        let seq = LineSequence::split(b"a\r");
        assert_eq!(contents(&seq), vec![&b"a\r\n"[..]]);
        assert!(!seq.had_trailing_terminator());
    }

    #[test]
    fn test_split_borrows_terminated_records() {
        let seq = LineSequence::split(b"a\nb");
        assert!(matches!(seq.records()[0].bytes, Cow::Borrowed(_)));
        assert!(matches!(seq.records()[1].bytes, Cow::Owned(_)));
    }

    #[test]
    fn test_reverse_odd_length() {
        let mut seq = LineSequence::split(b"1\n2\n3\n");
        seq.reverse();
        assert_eq!(contents(&seq), vec![&b"3\n"[..], &b"2\n"[..], &b"1\n"[..]]);
    }

    #[test]
    fn test_strip_terminator_only_removes_lf() {
        let mut record = LineRecord::borrowed(b"x\r\n");
        assert!(record.strip_terminator());
        assert_eq!(record.as_bytes(), b"x\r");

        let mut bare = LineRecord::borrowed(b"x");
        assert!(!bare.strip_terminator());
        assert_eq!(bare.as_bytes(), b"x");
    }

    #[test]
    fn test_take_leading() {
        let mut seq = LineSequence::split(b"##BCKL.NNL##\nc\n");
        assert!(seq.take_leading(NO_NEWLINE_MARKER));
        assert_eq!(contents(&seq), vec![&b"c\n"[..]]);
        assert!(!seq.take_leading(NO_NEWLINE_MARKER));
    }

    #[test]
    fn test_join_reproduces_terminated_input() {
        let input = b"one\r\ntwo\n\nthree\n";
        assert_eq!(LineSequence::split(input).join(), input.to_vec());
    }
}
