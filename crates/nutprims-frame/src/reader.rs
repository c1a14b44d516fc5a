use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use nutprims_transport::NutStream;
use tracing::trace;

use crate::codec::{decode_line, Framing, LineConfig, ERROR_PREFIX};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads newline-terminated response lines from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete lines.
/// Bytes received past the end of one response stay buffered for the next.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    config: LineConfig,
}

impl<T: Read> LineReader<T> {
    /// Create a new line reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineConfig::default())
    }

    /// Create a new line reader with explicit configuration.
    pub fn with_config(inner: T, config: LineConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete line (blocking), without its line ending.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached,
    /// including EOF in the middle of an unterminated line.
    pub fn read_line(&mut self) -> Result<String> {
        loop {
            if let Some(line) = decode_line(&mut self.buf, self.config.max_line_length)? {
                trace!(line = %line, "received line");
                return Ok(line);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Read one complete response.
    ///
    /// In single-line mode this is exactly one line. In multi-line mode every
    /// line up to and including the terminator is returned, unless the first
    /// line is a server error, which the server never follows with a
    /// terminator.
    pub fn read_response(&mut self, framing: &Framing) -> Result<Vec<String>> {
        let mut response = Vec::new();

        loop {
            let line = self.read_line()?;
            let done = !framing.multi_line
                || line == framing.terminator
                || (response.is_empty() && line.starts_with(ERROR_PREFIX));
            response.push(line);
            if done {
                return Ok(response);
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current line reader configuration.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }
}

impl LineReader<NutStream> {
    /// Create a line reader for `NutStream` and apply read timeout from config.
    pub fn with_config_tcp(inner: NutStream, config: LineConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

pub(crate) fn transport_to_frame_error(err: nutprims_transport::TransportError) -> FrameError {
    match err {
        nutprims_transport::TransportError::Io(io) => FrameError::Io(io),
        nutprims_transport::TransportError::Resolve { source, .. }
        | nutprims_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
