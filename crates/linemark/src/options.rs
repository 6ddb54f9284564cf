/// Configuration options for [`LineReader`](crate::LineReader).
///
/// # Default
///
/// `detect_preamble` defaults to `false` and `buffer_size` to 4096.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Whether to test the head of the stream against the encoding's
    /// preamble and skip it.
    ///
    /// A skipped preamble advances the byte accounting but is not counted as
    /// characters; bookmarks taken after it never include it. When `false`,
    /// a preamble present in the stream is decoded as ordinary text (for
    /// UTF-8 that is a leading U+FEFF).
    ///
    /// # Default
    ///
    /// `false`
    pub detect_preamble: bool,

    /// Size in bytes of the refill buffer.
    ///
    /// Values below [`MIN_BUFFER_SIZE`] are clamped up to it. Line content
    /// may be arbitrarily longer than the buffer; the buffer only bounds how
    /// many bytes each refill requests from the source.
    ///
    /// # Default
    ///
    /// `4096`
    pub buffer_size: usize,
}

/// Smallest refill buffer the reader will operate with.
pub const MIN_BUFFER_SIZE: usize = 16;

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            detect_preamble: false,
            buffer_size: 4096,
        }
    }
}
