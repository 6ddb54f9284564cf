//! Strict incremental UTF-8 decoding.

use super::{Convert, DecodeError, Decoder, Encoding};

/// The UTF-8 encoding.
#[derive(Debug)]
pub struct Utf8Encoding;

/// The UTF-8 encoding instance.
pub static UTF_8: Utf8Encoding = Utf8Encoding;

impl Encoding for Utf8Encoding {
    fn name(&self) -> &'static str {
        "utf-8"
    }

    fn is_single_byte(&self) -> bool {
        false
    }

    fn preamble(&self) -> &'static [u8] {
        &[0xEF, 0xBB, 0xBF]
    }

    // Worst case: one new byte completes a pending 4-byte scalar (two code
    // units), every remaining byte is ASCII.
    fn max_char_count(&self, byte_count: usize) -> usize {
        byte_count + 1
    }

    fn new_decoder(&self) -> Box<dyn Decoder> {
        Box::new(Utf8Decoder::new())
    }
}

/// Incremental UTF-8 decoder carrying a partial scalar across calls.
pub(crate) struct Utf8Decoder {
    pending: [u8; 4],
    pending_len: u8,
    expected_len: u8,
}

impl Utf8Decoder {
    pub(crate) fn new() -> Self {
        Self {
            pending: [0; 4],
            pending_len: 0,
            expected_len: 0,
        }
    }

    /// Assembles and validates the scalar buffered in `pending`.
    ///
    /// Rejects overlong forms, surrogates, and values past U+10FFFF.
    fn finish_scalar(&self, offset: usize) -> Result<u32, DecodeError> {
        let lead = self.pending[0];
        let mut scalar = match self.expected_len {
            2 => u32::from(lead & 0x1F),
            3 => u32::from(lead & 0x0F),
            _ => u32::from(lead & 0x07),
        };
        for &cont in &self.pending[1..usize::from(self.expected_len)] {
            scalar = (scalar << 6) | u32::from(cont & 0x3F);
        }
        let well_formed = match self.expected_len {
            2 => scalar >= 0x80,
            3 => scalar >= 0x800 && !(0xD800..=0xDFFF).contains(&scalar),
            _ => (0x1_0000..=0x10_FFFF).contains(&scalar),
        };
        if well_formed {
            Ok(scalar)
        } else {
            Err(DecodeError {
                valid_up_to: offset,
            })
        }
    }
}

/// Writes `scalar` as one code unit, or as a surrogate pair above U+FFFF.
#[allow(clippy::cast_possible_truncation)]
fn encode_units(scalar: u32, out: &mut [u16]) -> usize {
    if scalar <= 0xFFFF {
        out[0] = scalar as u16;
        1
    } else {
        let v = scalar - 0x1_0000;
        out[0] = 0xD800 | (v >> 10) as u16;
        out[1] = 0xDC00 | (v & 0x3FF) as u16;
        2
    }
}

impl Decoder for Utf8Decoder {
    fn convert(&mut self, bytes: &[u8], out: &mut [u16]) -> Result<Convert, DecodeError> {
        let mut written = 0;
        for (offset, &byte) in bytes.iter().enumerate() {
            if self.expected_len == 0 {
                if byte < 0x80 {
                    out[written] = u16::from(byte);
                    written += 1;
                    continue;
                }
                self.expected_len = match byte {
                    0xC0..=0xDF => 2,
                    0xE0..=0xEF => 3,
                    0xF0..=0xF7 => 4,
                    // Stray continuation byte or out-of-range lead.
                    _ => return Err(DecodeError { valid_up_to: offset }),
                };
                self.pending[0] = byte;
                self.pending_len = 1;
            } else {
                if byte & 0xC0 != 0x80 {
                    return Err(DecodeError { valid_up_to: offset });
                }
                self.pending[usize::from(self.pending_len)] = byte;
                self.pending_len += 1;
                if self.pending_len == self.expected_len {
                    let scalar = self.finish_scalar(offset)?;
                    written += encode_units(scalar, &mut out[written..]);
                    self.pending_len = 0;
                    self.expected_len = 0;
                }
            }
        }
        Ok(Convert {
            bytes_read: bytes.len(),
            chars_written: written,
            completed: self.expected_len == 0,
        })
    }

    fn reset(&mut self) {
        self.pending_len = 0;
        self.expected_len = 0;
    }
}
