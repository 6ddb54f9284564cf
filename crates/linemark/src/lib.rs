//! Buffered line reading with resumable byte/character bookmarks.
//!
//! A [`LineReader`] returns one line at a time from a seekable byte stream
//! and exposes, for every line, a [`LineBookmark`] recording the absolute
//! byte offset and the absolute character index (in 16-bit code units) at
//! which that line begins or ends. A fresh reader over the same (possibly
//! grown, never rewritten) stream can be seeded with such a bookmark and
//! resumes with byte-identical, character-index-identical results.
//!
//! What makes this non-trivial is position accounting across a buffered
//! decode: the buffer fetches more bytes than the caller consumes,
//! variable-length encodings advance bytes and characters at different
//! rates, multi-byte sequences straddle refills, line APIs strip
//! terminators, and a leading byte-order mark must not be counted as a
//! character. The crate tracks all of it so a bookmark is just two
//! integers.
//!
//! Supported encodings: UTF-8, UTF-16 (either byte order), and any
//! single-byte code page where each byte decodes to one code unit (see
//! [`encoding`]).
//!
//! # Examples
//!
//! ```
//! use std::io::Cursor;
//! use linemark::{encoding, LineEnding, LineReader};
//!
//! # fn main() -> Result<(), linemark::ReadError> {
//! let mut reader = LineReader::new(
//!     Cursor::new(b"abcdef\r\nxyzzy\nfoobar".to_vec()),
//!     &encoding::UTF_8,
//! )?;
//!
//! let line = reader.read_detailed_line()?.unwrap();
//! assert_eq!(line.text_without_line_ending(), "abcdef");
//! assert_eq!(line.line_ending(), LineEnding::CrLf);
//! assert_eq!(line.start_position(), 0);
//! assert_eq!(line.last_line_ending_position(), 7);
//!
//! // Persist the bookmark anywhere; it is two integers.
//! let (position, char_index) = line.read_next_bookmark().to_wire();
//! assert_eq!((position, char_index), (8, 8));
//! # Ok(())
//! # }
//! ```

mod bookmark;
pub mod encoding;
mod error;
mod line;
mod options;
mod reader;

pub use bookmark::LineBookmark;
pub use error::ReadError;
pub use line::{DetailedLine, LineEnding};
pub use options::{ReaderOptions, MIN_BUFFER_SIZE};
pub use reader::LineReader;
