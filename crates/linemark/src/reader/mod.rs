//! The bookmarking line reader.
//!
//! [`LineReader`] drives a seekable byte source through an incremental
//! decoder, scans the decoded code units for line terminators, and emits a
//! [`DetailedLine`] per line with absolute byte/character positions and
//! resumable bookmarks. The position accounting is delegated to
//! [`PositionTracker`]; the reader's own job is the refill loop, preamble
//! handling, terminator classification, and resume.
//!
//! The reader is single-threaded and blocking; its only suspension points
//! are the source reads. It deliberately offers no raw character read,
//! peek, or read-to-end: consuming characters outside the line scan would
//! desynchronize the tracker.

mod advance;
mod tracker;

use std::io::{Read, Seek, SeekFrom};

use crate::bookmark::LineBookmark;
use crate::encoding::{self, Decoder, Encoding};
use crate::error::ReadError;
use crate::line::{DetailedLine, LineEnding};
use crate::options::{ReaderOptions, MIN_BUFFER_SIZE};
use tracker::PositionTracker;

const CR: u16 = 0x0D;
const LF: u16 = 0x0A;

/// A buffered line reader over a seekable byte source, returning one
/// [`DetailedLine`] at a time and a resumable [`LineBookmark`] per line.
///
/// The source is assumed append-only with a stable prefix: bytes already
/// observed at an offset must not change. Growing the stream and resuming
/// from a previous line's [`read_next_bookmark`] continues reading exactly
/// where that line ended.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use linemark::{encoding, LineReader};
///
/// # fn main() -> Result<(), linemark::ReadError> {
/// let bytes = b"first\r\nsecond".to_vec();
/// let mut reader = LineReader::new(Cursor::new(bytes.clone()), &encoding::UTF_8)?;
///
/// let first = reader.read_detailed_line()?.unwrap();
/// assert_eq!(first.text_without_line_ending(), "first");
///
/// // Any fresh reader over the same stream can pick up where this one
/// // left off.
/// let mut resumed = LineReader::new(Cursor::new(bytes), &encoding::UTF_8)?;
/// resumed.resume_from_bookmark(first.read_next_bookmark())?;
/// let second = resumed.read_detailed_line()?.unwrap();
/// assert_eq!(second.text_without_line_ending(), "second");
/// # Ok(())
/// # }
/// ```
///
/// [`read_next_bookmark`]: DetailedLine::read_next_bookmark
pub struct LineReader<R> {
    source: R,
    encoding: &'static dyn Encoding,
    decoder: Box<dyn Decoder>,
    tracker: PositionTracker,
    byte_buf: Vec<u8>,
    char_buf: Vec<u16>,
    /// Decoded code units valid in `char_buf`.
    char_len: usize,
    /// Scan cursor into `char_buf`.
    char_pos: usize,
    /// Code units of the line being accumulated, terminator excluded.
    line_units: Vec<u16>,
    detect_preamble: bool,
    /// Preamble detection still pending on the next refill.
    first_fill_pending: bool,
    /// Nothing consumed since construction or a resume to the start; the
    /// pre-line bookmark is the start sentinel.
    at_stream_start: bool,
    /// Bytes skipped for a detected preamble.
    preamble_len: u64,
    eof: bool,
    poisoned: bool,
    debug_hook: Option<Box<dyn FnMut(&str)>>,
}

impl<R: Read + Seek> LineReader<R> {
    /// Builds a reader with default [`ReaderOptions`].
    ///
    /// # Errors
    ///
    /// [`ReadError::UnsupportedEncoding`] unless the encoding is
    /// single-byte, UTF-8, or a UTF-16 variant.
    pub fn new(source: R, encoding: &'static dyn Encoding) -> Result<Self, ReadError> {
        Self::with_options(source, encoding, ReaderOptions::default())
    }

    /// Builds a reader with explicit options.
    ///
    /// # Errors
    ///
    /// [`ReadError::UnsupportedEncoding`] unless the encoding is
    /// single-byte, UTF-8, or a UTF-16 variant.
    pub fn with_options(
        source: R,
        encoding: &'static dyn Encoding,
        options: ReaderOptions,
    ) -> Result<Self, ReadError> {
        if encoding::family_of(encoding).is_none() {
            return Err(ReadError::UnsupportedEncoding(encoding.name()));
        }
        let buffer_size = options.buffer_size.max(MIN_BUFFER_SIZE);
        Ok(Self {
            source,
            encoding,
            decoder: encoding.new_decoder(),
            tracker: PositionTracker::new(),
            byte_buf: vec![0; buffer_size],
            char_buf: vec![0; encoding.max_char_count(buffer_size)],
            char_len: 0,
            char_pos: 0,
            line_units: Vec::new(),
            detect_preamble: options.detect_preamble,
            first_fill_pending: true,
            at_stream_start: true,
            preamble_len: 0,
            eof: false,
            poisoned: false,
            debug_hook: None,
        })
    }

    /// The encoding this reader decodes with.
    #[must_use]
    pub fn encoding(&self) -> &'static dyn Encoding {
        self.encoding
    }

    /// Installs a hook receiving human-readable progress strings (refills,
    /// preamble skips, resumes). Diagnostic only; no semantic effect.
    pub fn set_debug_hook(&mut self, hook: impl FnMut(&str) + 'static) {
        self.debug_hook = Some(Box::new(hook));
    }

    /// Reads the next line, or `None` when the stream is exhausted with no
    /// pending text.
    ///
    /// # Errors
    ///
    /// [`ReadError::Io`] from the source, [`ReadError::Decode`] for
    /// malformed bytes, and [`ReadError::UnsupportedOperation`] when called
    /// again after a failed call without an intervening resume.
    pub fn read_detailed_line(&mut self) -> Result<Option<DetailedLine>, ReadError> {
        if self.poisoned {
            return Err(ReadError::UnsupportedOperation(
                "reading after a failed call; resume from a bookmark first",
            ));
        }
        match self.read_line_inner() {
            Ok(line) => Ok(line),
            Err(err) => {
                self.poisoned = true;
                Err(err)
            }
        }
    }

    /// Repositions the reader at `bookmark` and discards all buffered
    /// state. The next [`read_detailed_line`] produces the same line a
    /// fresh reader seeded with this bookmark would.
    ///
    /// [`LineBookmark::Start`] re-runs preamble detection on the next
    /// refill; any other bookmark takes the byte offset verbatim.
    ///
    /// # Errors
    ///
    /// [`ReadError::InvalidBookmark`] when the target lies past the end of
    /// the stream or inside a known preamble, [`ReadError::Io`] when
    /// seeking fails.
    ///
    /// [`read_detailed_line`]: Self::read_detailed_line
    pub fn resume_from_bookmark(&mut self, bookmark: LineBookmark) -> Result<(), ReadError> {
        match bookmark {
            LineBookmark::Start => {
                self.source.seek(SeekFrom::Start(0))?;
                self.tracker.forget_state();
                self.first_fill_pending = true;
                self.at_stream_start = true;
                self.preamble_len = 0;
            }
            LineBookmark::At {
                position,
                char_index,
            } => {
                self.validate_resume_target(position, char_index)?;
                self.source.seek(SeekFrom::Start(position))?;
                self.tracker.moved_to_position(position, char_index);
                self.first_fill_pending = false;
                self.at_stream_start = false;
            }
        }
        self.decoder.reset();
        self.char_len = 0;
        self.char_pos = 0;
        self.line_units.clear();
        self.eof = false;
        self.poisoned = false;
        if let Some(hook) = self.debug_hook.as_mut() {
            hook(&format!("resumed from {bookmark:?}"));
        }
        Ok(())
    }

    /// Repositions at the very start of the stream; preamble detection is
    /// re-run on the next refill.
    ///
    /// # Errors
    ///
    /// [`ReadError::Io`] when seeking fails.
    pub fn resume_from_beginning(&mut self) -> Result<(), ReadError> {
        self.resume_from_bookmark(LineBookmark::Start)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn validate_resume_target(&mut self, position: u64, char_index: u64) -> Result<(), ReadError> {
        let invalid = |reason| ReadError::InvalidBookmark {
            position: position as i64,
            char_index: char_index as i64,
            reason,
        };
        if char_index > position {
            return Err(invalid("character index exceeds byte offset"));
        }
        // A verbatim offset must not land inside the preamble; only the
        // start sentinel may address it. Offset zero stays legal unless
        // this reader has actually observed a preamble, since the stream
        // may not carry one.
        let inside_known_preamble = if self.preamble_len > 0 {
            position < self.preamble_len
        } else {
            self.detect_preamble
                && position > 0
                && position < self.encoding.preamble().len() as u64
        };
        if inside_known_preamble {
            return Err(invalid("target lies inside the stream preamble"));
        }
        // Probe the stream length, putting the source back so a rejected
        // resume leaves the reader exactly where it was.
        let current = self.source.stream_position()?;
        let stream_len = self.source.seek(SeekFrom::End(0))?;
        self.source.seek(SeekFrom::Start(current))?;
        if position > stream_len {
            return Err(invalid("target lies past the end of the stream"));
        }
        Ok(())
    }

    fn read_line_inner(&mut self) -> Result<Option<DetailedLine>, ReadError> {
        let before = self.snapshot_bookmark();
        self.line_units.clear();

        loop {
            if self.char_pos == self.char_len && !self.fill()? {
                if self.line_units.is_empty() {
                    return Ok(None);
                }
                let end_byte = self.byte_position_of_cursor() - 1;
                let end_char = self.char_position_of_cursor() - 1;
                return Ok(Some(self.emit(before, LineEnding::None, end_byte, end_char)?));
            }
            match self.char_buf[self.char_pos] {
                CR => {
                    self.char_pos += 1;
                    // Positions of a lone CR, captured before the peek can
                    // refill and invalidate this buffer's mapping.
                    let cr_end_byte = self.byte_position_of_cursor() - 1;
                    let cr_end_char = self.char_position_of_cursor() - 1;
                    if self.char_pos == self.char_len && !self.fill()? {
                        return Ok(Some(self.emit(
                            before,
                            LineEnding::Cr,
                            cr_end_byte,
                            cr_end_char,
                        )?));
                    }
                    if self.char_buf[self.char_pos] == LF {
                        self.char_pos += 1;
                        let end_byte = self.byte_position_of_cursor() - 1;
                        let end_char = self.char_position_of_cursor() - 1;
                        return Ok(Some(self.emit(
                            before,
                            LineEnding::CrLf,
                            end_byte,
                            end_char,
                        )?));
                    }
                    return Ok(Some(self.emit(
                        before,
                        LineEnding::Cr,
                        cr_end_byte,
                        cr_end_char,
                    )?));
                }
                LF => {
                    self.char_pos += 1;
                    let end_byte = self.byte_position_of_cursor() - 1;
                    let end_char = self.char_position_of_cursor() - 1;
                    return Ok(Some(self.emit(before, LineEnding::Lf, end_byte, end_char)?));
                }
                unit => {
                    self.line_units.push(unit);
                    self.char_pos += 1;
                }
            }
        }
    }

    /// The bookmark for the position the next read starts from.
    fn snapshot_bookmark(&self) -> LineBookmark {
        if self.at_stream_start {
            LineBookmark::Start
        } else {
            LineBookmark::At {
                position: self.byte_position_of_cursor(),
                char_index: self.char_position_of_cursor(),
            }
        }
    }

    /// Refills the character buffer. Returns `false` at end of stream.
    ///
    /// Each pass reads raw bytes, runs first-refill preamble detection,
    /// decodes, and hands the refill to the tracker. A pass that decodes
    /// zero characters (a scalar straddling the refill boundary) loops to
    /// read more. At end of stream, bytes of an unfinished character held
    /// by the decoder are discarded text.
    fn fill(&mut self) -> Result<bool, ReadError> {
        if self.eof {
            return Ok(false);
        }
        loop {
            let mut filled = self.source.read(&mut self.byte_buf)?;
            if self.first_fill_pending && self.detect_preamble {
                // A short first read may split the preamble; top it up.
                let preamble_len = self.encoding.preamble().len();
                while filled > 0 && filled < preamble_len {
                    let more = self.source.read(&mut self.byte_buf[filled..])?;
                    if more == 0 {
                        break;
                    }
                    filled += more;
                }
            }
            if filled == 0 {
                self.eof = true;
                if let Some(hook) = self.debug_hook.as_mut() {
                    hook("end of stream");
                }
                return Ok(false);
            }
            let mut bytes = &self.byte_buf[..filled];
            if self.first_fill_pending {
                self.first_fill_pending = false;
                if self.detect_preamble {
                    let preamble = self.encoding.preamble();
                    if !preamble.is_empty() && bytes.starts_with(preamble) {
                        bytes = &bytes[preamble.len()..];
                        self.preamble_len = preamble.len() as u64;
                        self.tracker.moved_past_preamble(preamble.len());
                        if let Some(hook) = self.debug_hook.as_mut() {
                            hook(&format!("skipped {}-byte preamble", preamble.len()));
                        }
                    }
                }
            }
            if bytes.is_empty() {
                // The whole read was the preamble.
                continue;
            }
            let convert = match self.decoder.convert(bytes, &mut self.char_buf) {
                Ok(convert) => convert,
                Err(err) => {
                    let after_read = self.source.stream_position()?;
                    return Err(ReadError::Decode {
                        encoding: self.encoding.name(),
                        position: after_read - (bytes.len() - err.valid_up_to) as u64,
                    });
                }
            };
            debug_assert_eq!(convert.bytes_read, bytes.len());
            let chars = convert.chars_written;
            self.tracker
                .read_bytes_and_chars(bytes.len(), chars, bytes, &self.char_buf[..chars], self.encoding);
            self.char_len = chars;
            self.char_pos = 0;
            if let Some(hook) = self.debug_hook.as_mut() {
                hook(&format!("refill: {} bytes, {chars} chars", bytes.len()));
            }
            if chars > 0 {
                return Ok(true);
            }
            // The refill ended inside a multi-byte character; keep reading.
        }
    }

    fn emit(
        &mut self,
        before: LineBookmark,
        line_ending: LineEnding,
        last_line_ending_position: u64,
        last_seen_char_index: u64,
    ) -> Result<DetailedLine, ReadError> {
        self.at_stream_start = false;
        let start_position = match before {
            LineBookmark::Start => self.preamble_len,
            LineBookmark::At { position, .. } => position,
        };
        let text = String::from_utf16(&self.line_units).map_err(|_| ReadError::Decode {
            encoding: self.encoding.name(),
            position: start_position,
        })?;
        self.line_units.clear();
        Ok(DetailedLine {
            text,
            line_ending,
            start_position,
            last_line_ending_position,
            last_seen_char_index,
            before_reading_bookmark: before,
        })
    }

    /// Absolute byte offset of the scan cursor. The cursor always lies
    /// within the tracked buffer.
    fn byte_position_of_cursor(&self) -> u64 {
        match self.tracker.absolute_byte_position_of_char_index(self.char_pos) {
            Some(position) => position,
            None => unreachable!("scan cursor outside the tracked buffer"),
        }
    }

    /// Absolute character index of the scan cursor.
    fn char_position_of_cursor(&self) -> u64 {
        match self.tracker.absolute_char_position_of_char_index(self.char_pos) {
            Some(index) => index,
            None => unreachable!("scan cursor outside the tracked buffer"),
        }
    }
}
