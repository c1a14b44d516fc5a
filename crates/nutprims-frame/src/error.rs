/// Errors that can occur while writing commands or reading response lines.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A single response line exceeded the configured maximum length.
    #[error("line too long ({size} bytes, max {max})")]
    LineTooLong { size: usize, max: usize },

    /// A command contained a line break and cannot be sent as one line.
    #[error("command contains an embedded line break")]
    EmbeddedNewline,

    /// A response line was not valid UTF-8.
    #[error("response line is not valid UTF-8")]
    InvalidUtf8,

    /// An I/O error occurred while reading or writing lines.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before the response was complete.
    #[error("connection closed (incomplete response)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
