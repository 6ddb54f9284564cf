//! Absolute byte/character position accounting across buffer refills.
//!
//! The tracker anchors the absolute byte offset and absolute character
//! index of the start of the current decode buffer, folds each finished
//! buffer into those anchors on refill, and answers position queries for
//! character indices inside the current buffer. It knows nothing about
//! lines; it is the single authority on byte/char correspondence.
//!
//! For single-byte encodings no advancement table is built: byte offset and
//! character index coincide within a buffer. For UTF-8 and UTF-16 the
//! tracker owns a [`CharAdvancer`] whose cross-buffer state survives
//! refills, and rebuilds it whenever the encoding identity changes
//! (including across a resume, which drops all buffer state).

use crate::encoding::{family_of, Encoding, EncodingFamily};
use crate::reader::advance::{ByteAdvancementInfo, CharAdvancer};

#[derive(Debug)]
pub(crate) struct PositionTracker {
    /// Absolute byte offset of the first byte of the current buffer.
    buffer_byte_anchor: u64,
    /// Absolute character index of the first character of the current
    /// buffer.
    buffer_char_anchor: u64,
    buffer_byte_count: usize,
    buffer_char_count: usize,
    single_byte: bool,
    advancer: Option<CharAdvancer>,
    info: Option<ByteAdvancementInfo>,
}

impl PositionTracker {
    pub(crate) fn new() -> Self {
        Self {
            buffer_byte_anchor: 0,
            buffer_char_anchor: 0,
            buffer_byte_count: 0,
            buffer_char_count: 0,
            single_byte: false,
            advancer: None,
            info: None,
        }
    }

    /// Forgets all buffer state and re-anchors at the given absolute
    /// position. Called on open, on resume, and whenever the reader
    /// deliberately discards its buffer.
    pub(crate) fn moved_to_position(&mut self, byte_position: u64, char_index: u64) {
        self.buffer_byte_anchor = byte_position;
        self.buffer_char_anchor = char_index;
        self.buffer_byte_count = 0;
        self.buffer_char_count = 0;
        self.single_byte = false;
        self.advancer = None;
        self.info = None;
    }

    /// Advances the byte anchor past a skipped preamble. The character
    /// anchor is untouched: preamble bytes decode to no counted characters.
    pub(crate) fn moved_past_preamble(&mut self, byte_len: usize) {
        self.buffer_byte_anchor += byte_len as u64;
    }

    /// Full reset to the stream origin.
    pub(crate) fn forget_state(&mut self) {
        self.moved_to_position(0, 0);
    }

    /// Records a refill: folds the previous buffer's lengths into the
    /// anchors, stores the new lengths, and builds the advancement table
    /// for the new bytes.
    ///
    /// Must be called after the bytes have been decoded; `chars` is the
    /// decoded output corresponding to `bytes`.
    pub(crate) fn read_bytes_and_chars(
        &mut self,
        byte_count: usize,
        char_count: usize,
        bytes: &[u8],
        chars: &[u16],
        encoding: &dyn Encoding,
    ) {
        debug_assert_eq!(bytes.len(), byte_count);
        debug_assert_eq!(chars.len(), char_count);

        self.buffer_byte_anchor += self.buffer_byte_count as u64;
        self.buffer_char_anchor += self.buffer_char_count as u64;
        self.buffer_byte_count = byte_count;
        self.buffer_char_count = char_count;

        match family_of(encoding) {
            Some(EncodingFamily::SingleByte) => {
                self.single_byte = true;
                self.advancer = None;
                self.info = None;
            }
            Some(family) => {
                self.single_byte = false;
                let stale = self
                    .advancer
                    .as_ref()
                    .map_or(true, |advancer| advancer.encoding_name() != encoding.name());
                if stale {
                    self.advancer = Some(match family {
                        EncodingFamily::Utf8 => CharAdvancer::utf8(),
                        EncodingFamily::Utf16 { big_endian } => CharAdvancer::utf16(big_endian),
                        EncodingFamily::SingleByte => unreachable!(),
                    });
                }
                if let Some(advancer) = self.advancer.as_mut() {
                    self.info = Some(advancer.advance(bytes));
                }
            }
            // The reader's construction gate admits only supported encodings.
            None => unreachable!("unsupported encoding reached the tracker"),
        }
    }

    /// Absolute byte offset at which the character at buffer-relative index
    /// `char_index` begins.
    ///
    /// `char_index` equal to one past the last fully decoded character maps
    /// to just past the buffer when the buffer ends on a character
    /// boundary; when it ends mid-character, the mapping lands on the first
    /// byte of that incomplete character. Indices past the buffer have no
    /// mapping.
    pub(crate) fn absolute_byte_position_of_char_index(&self, char_index: usize) -> Option<u64> {
        if self.single_byte {
            // Byte offset = char index within the buffer.
            return Some(self.buffer_byte_anchor + char_index as u64);
        }
        let Some(info) = &self.info else {
            // Nothing decoded since the last re-anchor; only the anchor
            // itself is addressable.
            return (char_index == 0).then_some(self.buffer_byte_anchor);
        };
        if char_index == self.buffer_char_count && info.extra_incomplete_char_with_byte_count == 0 {
            return Some(self.buffer_byte_anchor + self.buffer_byte_count as u64);
        }
        for (byte_index, &index) in info.char_indexes_at_byte_index.iter().enumerate() {
            if index >= char_index {
                let extends_back = if byte_index == 0 && index == char_index {
                    // The character begins in the previous buffer.
                    info.first_char_extends_back_byte_count
                } else {
                    0
                };
                return Some(self.buffer_byte_anchor + byte_index as u64 - extends_back as u64);
            }
        }
        None
    }

    /// Absolute character index of the buffer-relative code unit
    /// `char_index`. Code units are decoded contiguously, so this is the
    /// character anchor plus the relative index for any index inside the
    /// buffer (or one past it); anything further has no mapping.
    pub(crate) fn absolute_char_position_of_char_index(&self, char_index: usize) -> Option<u64> {
        if self.single_byte {
            return Some(self.buffer_char_anchor + char_index as u64);
        }
        (char_index <= self.buffer_char_count)
            .then(|| self.buffer_char_anchor + char_index as u64)
    }
}
