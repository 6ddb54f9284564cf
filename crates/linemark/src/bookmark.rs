//! Resumable positions in a line stream.
//!
//! A [`LineBookmark`] is the pair of absolute coordinates (byte offset in
//! the source, character index in the decoded text) at which a line
//! begins. It is all the state needed to resume reading: a fresh reader over
//! the same (possibly grown) stream seeded with a bookmark produces
//! byte-identical and character-index-identical lines.

use crate::error::ReadError;

/// A resumable position in a line stream.
///
/// Bookmarks are pure values: copyable, comparable, hashable, and safe to
/// share across threads. They are produced by
/// [`DetailedLine::reread_bookmark`] and
/// [`DetailedLine::read_next_bookmark`] and consumed by
/// [`LineReader::resume_from_bookmark`].
///
/// [`DetailedLine::reread_bookmark`]: crate::DetailedLine::reread_bookmark
/// [`DetailedLine::read_next_bookmark`]: crate::DetailedLine::read_next_bookmark
/// [`LineReader::resume_from_bookmark`]: crate::LineReader::resume_from_bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineBookmark {
    /// Before the stream, including its optional preamble.
    ///
    /// Resuming here re-runs preamble detection; this is the only bookmark
    /// that does.
    Start,
    /// At the line beginning at this position.
    At {
        /// Absolute byte offset in the source at which the line begins.
        position: u64,
        /// Absolute character index (in 16-bit code units, preamble
        /// excluded) at which the line begins.
        char_index: u64,
    },
}

impl LineBookmark {
    /// Encodes the bookmark as the two signed 64-bit integers of its wire
    /// format: `(position, char_index)`, with `(-1, -1)` for [`Start`].
    ///
    /// [`Start`]: LineBookmark::Start
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_wire(self) -> (i64, i64) {
        match self {
            Self::Start => (-1, -1),
            Self::At {
                position,
                char_index,
            } => (position as i64, char_index as i64),
        }
    }

    /// Decodes a bookmark from its wire format.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::InvalidBookmark`] unless both fields are `-1`,
    /// or both are non-negative with `char_index <= position` (every
    /// character occupies at least one byte).
    #[allow(clippy::cast_sign_loss)]
    pub fn from_wire(position: i64, char_index: i64) -> Result<Self, ReadError> {
        match (position, char_index) {
            (-1, -1) => Ok(Self::Start),
            (p, c) if p >= 0 && c >= 0 && c <= p => Ok(Self::At {
                position: p as u64,
                char_index: c as u64,
            }),
            _ => Err(ReadError::InvalidBookmark {
                position,
                char_index,
                reason: "fields must both be -1, or both non-negative with char_index <= position",
            }),
        }
    }
}
