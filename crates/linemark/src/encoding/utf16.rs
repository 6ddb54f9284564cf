//! UTF-16 decoding, either byte order.
//!
//! Two bytes form one code unit; surrogate halves pass through unpaired
//! because character indices count code units, not scalars. A refill ending
//! on an odd byte leaves that byte pending for the next call.

use super::{Convert, DecodeError, Decoder, Encoding};

/// A UTF-16 encoding of fixed byte order.
#[derive(Debug)]
pub struct Utf16Encoding {
    big_endian: bool,
}

/// UTF-16, little-endian.
pub static UTF_16LE: Utf16Encoding = Utf16Encoding { big_endian: false };

/// UTF-16, big-endian.
pub static UTF_16BE: Utf16Encoding = Utf16Encoding { big_endian: true };

impl Encoding for Utf16Encoding {
    fn name(&self) -> &'static str {
        if self.big_endian {
            "utf-16be"
        } else {
            "utf-16le"
        }
    }

    fn is_single_byte(&self) -> bool {
        false
    }

    fn preamble(&self) -> &'static [u8] {
        if self.big_endian {
            &[0xFE, 0xFF]
        } else {
            &[0xFF, 0xFE]
        }
    }

    // A pending byte plus the input rounds up to one extra unit.
    fn max_char_count(&self, byte_count: usize) -> usize {
        byte_count / 2 + 1
    }

    fn new_decoder(&self) -> Box<dyn Decoder> {
        Box::new(Utf16Decoder {
            big_endian: self.big_endian,
            pending: None,
        })
    }
}

pub(crate) struct Utf16Decoder {
    big_endian: bool,
    pending: Option<u8>,
}

impl Utf16Decoder {
    fn combine(&self, first: u8, second: u8) -> u16 {
        if self.big_endian {
            u16::from(first) << 8 | u16::from(second)
        } else {
            u16::from(second) << 8 | u16::from(first)
        }
    }
}

impl Decoder for Utf16Decoder {
    fn convert(&mut self, bytes: &[u8], out: &mut [u16]) -> Result<Convert, DecodeError> {
        let mut written = 0;
        let mut rest = bytes;
        if let Some(first) = self.pending.take() {
            if let Some((&second, tail)) = rest.split_first() {
                out[written] = self.combine(first, second);
                written += 1;
                rest = tail;
            } else {
                self.pending = Some(first);
            }
        }
        let mut pairs = rest.chunks_exact(2);
        for pair in &mut pairs {
            out[written] = self.combine(pair[0], pair[1]);
            written += 1;
        }
        if let &[lone] = pairs.remainder() {
            self.pending = Some(lone);
        }
        Ok(Convert {
            bytes_read: bytes.len(),
            chars_written: written,
            completed: self.pending.is_none(),
        })
    }

    fn reset(&mut self) {
        self.pending = None;
    }
}
