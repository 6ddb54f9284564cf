//! Byte-advancement tables: per refilled buffer, the mapping from byte
//! positions inside the buffer to character indices inside the buffer.
//!
//! The advancer walks the raw bytes of each refill and produces a
//! [`ByteAdvancementInfo`]. Multi-byte characters can straddle two refills,
//! so the advancer keeps cross-buffer state between calls: the bytes of an
//! in-progress sequence already absorbed, and (for UTF-8) the scalar bits
//! accumulated so far.
//!
//! Invariants
//! - Continuation bytes carry the same character index as their lead byte.
//! - Bytes that begin a character completed only by the *next* buffer carry
//!   the index that character will have; they are also counted in
//!   `extra_incomplete_char_with_byte_count`.
//! - A buffer beginning mid-character reports in
//!   `first_char_extends_back_byte_count` how many of that character's
//!   bytes the *previous* buffer already absorbed.
//! - A completed scalar above U+FFFF advances the character index by two
//!   (its surrogate pair), everything else by one. UTF-16 advances one per
//!   16-bit unit regardless of surrogate pairing, because indices count
//!   code units, not scalars.
//!
//! The advancer only ever sees byte runs the decoder accepted; malformed
//! input fails decoding before these tables are built.

/// Byte-to-character mapping for the latest refilled buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ByteAdvancementInfo {
    /// For byte index `i` of the buffer, the character index (relative to
    /// the buffer's first character) at which byte `i` lies.
    pub(crate) char_indexes_at_byte_index: Vec<usize>,
    /// Bytes at the start of this buffer belonging to a character whose
    /// leading bytes lived in the previous buffer. 0-3 for UTF-8, 0-1 for
    /// UTF-16.
    pub(crate) first_char_extends_back_byte_count: usize,
    /// Bytes at the end of this buffer forming the prefix of a character
    /// whose remaining bytes lie in the next buffer.
    pub(crate) extra_incomplete_char_with_byte_count: usize,
}

/// The per-encoding-family advancer, held by value inside the tracker.
///
/// Single-byte encodings need no advancer at all; the tracker
/// short-circuits them with byte offset = char index.
#[derive(Debug)]
pub(crate) enum CharAdvancer {
    Utf8(Utf8Advancer),
    Utf16(Utf16Advancer),
}

impl CharAdvancer {
    pub(crate) fn utf8() -> Self {
        Self::Utf8(Utf8Advancer::default())
    }

    pub(crate) fn utf16(big_endian: bool) -> Self {
        Self::Utf16(Utf16Advancer::new(big_endian))
    }

    /// The identity of the encoding this advancer was built for; a mismatch
    /// means the advancer (and its cross-buffer state) must be rebuilt.
    pub(crate) fn encoding_name(&self) -> &'static str {
        match self {
            Self::Utf8(_) => "utf-8",
            Self::Utf16(advancer) => {
                if advancer.big_endian {
                    "utf-16be"
                } else {
                    "utf-16le"
                }
            }
        }
    }

    pub(crate) fn advance(&mut self, bytes: &[u8]) -> ByteAdvancementInfo {
        match self {
            Self::Utf8(advancer) => advancer.advance(bytes),
            Self::Utf16(advancer) => advancer.advance(bytes),
        }
    }
}

/// UTF-8 advancement state surviving across refills.
#[derive(Debug, Default)]
pub(crate) struct Utf8Advancer {
    /// Bytes of the in-progress scalar already absorbed, lead included.
    current_run: usize,
    /// Total bytes the in-progress scalar wants; 0 when between scalars.
    expected_run: usize,
    /// Data bits accumulated for the in-progress scalar. Needed because a
    /// completed scalar above U+FFFF occupies two code units.
    scalar_bits: u32,
}

impl Utf8Advancer {
    fn advance(&mut self, bytes: &[u8]) -> ByteAdvancementInfo {
        let first_char_extends_back_byte_count = if self.expected_run > 0 {
            self.current_run
        } else {
            0
        };
        let mut char_indexes_at_byte_index = Vec::with_capacity(bytes.len());
        let mut char_index = 0usize;
        for &byte in bytes {
            if self.expected_run > 0 {
                debug_assert_eq!(byte & 0xC0, 0x80);
                char_indexes_at_byte_index.push(char_index);
                self.scalar_bits = (self.scalar_bits << 6) | u32::from(byte & 0x3F);
                self.current_run += 1;
                if self.current_run == self.expected_run {
                    char_index += if self.scalar_bits > 0xFFFF { 2 } else { 1 };
                    self.current_run = 0;
                    self.expected_run = 0;
                    self.scalar_bits = 0;
                }
            } else if byte < 0x80 {
                char_indexes_at_byte_index.push(char_index);
                char_index += 1;
            } else if byte & 0xE0 == 0xC0 {
                char_indexes_at_byte_index.push(char_index);
                self.current_run = 1;
                self.expected_run = 2;
                self.scalar_bits = u32::from(byte & 0x1F);
            } else if byte & 0xF0 == 0xE0 {
                char_indexes_at_byte_index.push(char_index);
                self.current_run = 1;
                self.expected_run = 3;
                self.scalar_bits = u32::from(byte & 0x0F);
            } else if byte & 0xF8 == 0xF0 {
                char_indexes_at_byte_index.push(char_index);
                self.current_run = 1;
                self.expected_run = 4;
                self.scalar_bits = u32::from(byte & 0x07);
            } else {
                debug_assert!(false, "malformed lead byte {byte:#04X} passed the decoder");
                char_indexes_at_byte_index.push(char_index);
                char_index += 1;
            }
        }
        let extra_incomplete_char_with_byte_count = if self.expected_run > 0 {
            self.current_run
        } else {
            0
        };
        ByteAdvancementInfo {
            char_indexes_at_byte_index,
            first_char_extends_back_byte_count,
            extra_incomplete_char_with_byte_count,
        }
    }
}

/// UTF-16 advancement state: whether a unit's first byte is pending.
#[derive(Debug)]
pub(crate) struct Utf16Advancer {
    big_endian: bool,
    half_unit_pending: bool,
}

impl Utf16Advancer {
    fn new(big_endian: bool) -> Self {
        Self {
            big_endian,
            half_unit_pending: false,
        }
    }

    fn advance(&mut self, bytes: &[u8]) -> ByteAdvancementInfo {
        let first_char_extends_back_byte_count = usize::from(self.half_unit_pending);
        let mut char_indexes_at_byte_index = Vec::with_capacity(bytes.len());
        let mut char_index = 0usize;
        for _ in bytes {
            char_indexes_at_byte_index.push(char_index);
            if self.half_unit_pending {
                char_index += 1;
                self.half_unit_pending = false;
            } else {
                self.half_unit_pending = true;
            }
        }
        let extra_incomplete_char_with_byte_count = usize::from(self.half_unit_pending);
        ByteAdvancementInfo {
            char_indexes_at_byte_index,
            first_char_extends_back_byte_count,
            extra_incomplete_char_with_byte_count,
        }
    }
}
