use std::time::Duration;

/// Errors that terminate the output stream.
///
/// Every variant is fatal: the encoder never skips a line or retries a write,
/// since either would desynchronise the array framing already on the wire.
///
/// # Examples
///
/// ```rust
/// use i3jazz_common::error::EncodeError;
/// use std::io;
///
/// let err = EncodeError::from(io::Error::new(io::ErrorKind::BrokenPipe, "bar went away"));
/// assert!(err.to_string().contains("bar went away"));
/// assert!(err.is_broken_pipe());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// A header or status line could not be serialised to JSON.
    #[error("Encode: JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The output sink refused bytes (e.g. the bar closed its end of the pipe).
    #[error("Encode: write to output failed: {0}")]
    Write(#[from] std::io::Error),

    /// A single write did not complete within the configured bound.
    #[error("Encode: write to output timed out after {0:?}")]
    WriteTimeout(Duration),
}

impl EncodeError {
    /// Whether the reader on the other end of the pipe is gone.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, EncodeError::Write(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

/// Convenience `Result` alias for encoder operations.
pub type Result<T> = std::result::Result<T, EncodeError>;
