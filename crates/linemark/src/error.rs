use thiserror::Error;

/// Errors surfaced by [`LineReader`](crate::LineReader) and the bookmark wire
/// format.
///
/// Every error is fatal to the call that produced it. The reader stays in a
/// defined state: after a failed call, only [`resume_from_bookmark`],
/// [`resume_from_beginning`], or dropping the reader are legal; another read
/// attempt reports [`UnsupportedOperation`].
///
/// [`resume_from_bookmark`]: crate::LineReader::resume_from_bookmark
/// [`resume_from_beginning`]: crate::LineReader::resume_from_beginning
/// [`UnsupportedOperation`]: ReadError::UnsupportedOperation
#[derive(Debug, Error)]
pub enum ReadError {
    /// The encoding is neither single-byte nor a UTF-8/UTF-16 variant.
    #[error("unsupported encoding {0:?}")]
    UnsupportedEncoding(&'static str),

    /// The call is not legal in the reader's current state.
    #[error("operation not supported: {0}")]
    UnsupportedOperation(&'static str),

    /// The byte source failed.
    #[error("i/o failure")]
    Io(#[from] std::io::Error),

    /// A bookmark that cannot address a resumable position.
    #[error("invalid bookmark ({position}, {char_index}): {reason}")]
    InvalidBookmark {
        position: i64,
        char_index: i64,
        reason: &'static str,
    },

    /// The decoder rejected a byte sequence.
    #[error("malformed {encoding} byte sequence near offset {position}")]
    Decode {
        encoding: &'static str,
        /// Absolute byte offset at which the sequence was rejected.
        position: u64,
    },
}
