/// Errors that can occur while sending or receiving framed bytes.
///
/// Decode-side corruption is not an error: the decoder silently drops
/// malformed sequences and waits for the next delimiter.
#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    /// The frame exceeds the configured maximum size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing the stream.
    #[error("framing I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed.
    #[error("link closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FramingError>;
