use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::error::{FramingError, Result};
use crate::slip::{encode, FramingConfig};

/// Anything the interpreter can push a complete outbound frame into.
///
/// The frame interpreter builds responses synchronously while the pump
/// is mid-poll; this seam lets it write them without owning the stream.
pub trait FrameSink {
    /// Encode and send one complete inner frame.
    fn send_frame(&mut self, frame: &[u8]) -> Result<()>;
}

/// Writes SLIP-framed messages to any `Write` stream.
pub struct SlipWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FramingConfig,
}

impl<T: Write> SlipWriter<T> {
    /// Create a new writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FramingConfig::default())
    }

    /// Create a new writer with explicit configuration.
    pub fn with_config(inner: T, config: FramingConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
            config,
        }
    }

    /// SLIP-encode one frame and write it out, then flush.
    ///
    /// The whole encoded frame is written before returning; short writes
    /// and `Interrupted`/`WouldBlock` are retried. This layer does not
    /// retry a failed frame as a unit.
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > self.config.max_frame_size {
            return Err(FramingError::FrameTooLarge {
                size: frame.len(),
                max: self.config.max_frame_size,
            });
        }

        self.buf.clear();
        encode(frame, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FramingError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FramingError::Io(err)),
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
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FramingError::Io(err)),
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
}

impl<T: Write> FrameSink for SlipWriter<T> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.send(frame)
    }
}
