//! Lines and their terminators, with full position metadata.

use crate::bookmark::LineBookmark;

/// The terminator that ended a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// End of stream reached without a terminator.
    None,
    /// A lone carriage return.
    Cr,
    /// A line feed.
    Lf,
    /// A carriage return followed by a line feed.
    CrLf,
}

impl LineEnding {
    /// The terminator's text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Cr => "\r",
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Code units the terminator occupies: 0, 1, 1, 2.
    #[must_use]
    pub fn char_count(self) -> usize {
        match self {
            Self::None => 0,
            Self::Cr | Self::Lf => 1,
            Self::CrLf => 2,
        }
    }
}

/// One line of text together with the positions needed to re-read it or to
/// continue after it.
///
/// Returned by [`LineReader::read_detailed_line`]. All byte offsets are
/// absolute offsets into the underlying source; all character indices are
/// absolute counts of 16-bit code units in the decoded text, excluding any
/// skipped preamble.
///
/// [`LineReader::read_detailed_line`]: crate::LineReader::read_detailed_line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedLine {
    pub(crate) text: String,
    pub(crate) line_ending: LineEnding,
    pub(crate) start_position: u64,
    pub(crate) last_line_ending_position: u64,
    pub(crate) last_seen_char_index: u64,
    pub(crate) before_reading_bookmark: LineBookmark,
}

impl DetailedLine {
    /// The decoded characters of the line, terminator excluded.
    #[must_use]
    pub fn text_without_line_ending(&self) -> &str {
        &self.text
    }

    /// The decoded characters of the line, terminator included.
    #[must_use]
    pub fn text_with_line_ending(&self) -> String {
        let mut text = String::with_capacity(self.text.len() + 2);
        text.push_str(&self.text);
        text.push_str(self.line_ending.as_str());
        text
    }

    /// The terminator that ended this line.
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Absolute byte offset of the line's first byte.
    #[must_use]
    pub fn start_position(&self) -> u64 {
        self.start_position
    }

    /// Absolute byte offset of the last byte of the line including its
    /// terminator, or of the last text byte when the ending is
    /// [`LineEnding::None`].
    #[must_use]
    pub fn last_line_ending_position(&self) -> u64 {
        self.last_line_ending_position
    }

    /// Absolute byte offset of the line's last text byte: the terminator end
    /// minus 0 for [`None`], 1 for [`Cr`]/[`Lf`], 2 for [`CrLf`].
    ///
    /// [`None`]: LineEnding::None
    /// [`Cr`]: LineEnding::Cr
    /// [`Lf`]: LineEnding::Lf
    /// [`CrLf`]: LineEnding::CrLf
    #[must_use]
    pub fn last_text_position(&self) -> u64 {
        self.last_line_ending_position - self.line_ending.char_count() as u64
    }

    /// Absolute byte offset just past the line and its terminator; the next
    /// line (if any) begins here.
    #[must_use]
    pub fn position_after_line_ending(&self) -> u64 {
        self.last_line_ending_position + 1
    }

    /// Absolute character index of the final code unit emitted for this
    /// line, terminator included.
    #[must_use]
    pub fn last_seen_char_index(&self) -> u64 {
        self.last_seen_char_index
    }

    /// The bookmark captured before this line was read. Resuming from it
    /// re-reads this exact line.
    #[must_use]
    pub fn reread_bookmark(&self) -> LineBookmark {
        self.before_reading_bookmark
    }

    /// The bookmark addressing the position after this line. Resuming from
    /// it reads the following line, or nothing if the stream has not grown.
    #[must_use]
    pub fn read_next_bookmark(&self) -> LineBookmark {
        LineBookmark::At {
            position: self.last_line_ending_position + 1,
            char_index: self.last_seen_char_index + 1,
        }
    }
}
