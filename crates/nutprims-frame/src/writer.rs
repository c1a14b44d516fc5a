use std::io::{self, ErrorKind, Write};

use bytes::BytesMut;
use nutprims_transport::NutStream;

use crate::codec::{encode_line, LineConfig};
use crate::error::{FrameError, Result};
use crate::reader::transport_to_frame_error;

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Writes newline-terminated commands to any `Write` stream.
pub struct LineWriter<T> {
    inner: T,
    buf: BytesMut,
    config: LineConfig,
}

impl<T: Write> LineWriter<T> {
    /// Create a new line writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineConfig::default())
    }

    /// Create a new line writer with explicit configuration.
    pub fn with_config(inner: T, config: LineConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Send one command line (blocking).
    ///
    /// The newline is appended here; the whole line is written before
    /// returning. An expired write timeout surfaces as [`FrameError::Io`].
    pub fn send(&mut self, command: &str) -> Result<()> {
        if command.len() >= self.config.max_line_length {
            return Err(FrameError::LineTooLong {
                size: command.len(),
                max: self.config.max_line_length,
            });
        }

        self.buf.clear();
        encode_line(command, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::Io(io::Error::from(ErrorKind::WriteZero))),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
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

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current line writer configuration.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }
}

impl LineWriter<NutStream> {
    /// Create a line writer for `NutStream` and apply write timeout from config.
    pub fn with_config_tcp(inner: NutStream, config: LineConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}
