use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::Bytes;

use crate::error::{FramingError, Result};
use crate::slip::{FramingConfig, SlipDecoder};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads SLIP-framed messages from any `Read` stream.
///
/// Two consumption modes: `poll()` drains whatever bytes are currently
/// available without blocking (the node's tick path), and `read_frame()`
/// blocks until one complete frame arrives (the client path).
pub struct SlipReader<T> {
    inner: T,
    decoder: SlipDecoder,
    pending: VecDeque<Bytes>,
    closed: bool,
}

impl<T: Read> SlipReader<T> {
    /// Create a new reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FramingConfig::default())
    }

    /// Create a new reader with explicit configuration.
    pub fn with_config(inner: T, config: FramingConfig) -> Self {
        Self {
            inner,
            decoder: SlipDecoder::new(config.max_frame_size),
            pending: VecDeque::new(),
            closed: false,
        }
    }

    /// Consume all currently available input and return completed frames.
    ///
    /// Never blocks on a stream in nonblocking mode: `WouldBlock` ends
    /// the drain. Returns `FramingError::ConnectionClosed` once the
    /// stream has hit EOF and no decoded frames remain.
    pub fn poll(&mut self) -> Result<Vec<Bytes>> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while !self.closed {
            match self.inner.read(&mut chunk) {
                Ok(0) => self.closed = true,
                Ok(n) => self.pending.extend(self.decoder.feed(&chunk[..n])),
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FramingError::Io(err)),
            }
        }

        if self.pending.is_empty() && self.closed {
            return Err(FramingError::ConnectionClosed);
        }
        Ok(self.pending.drain(..).collect())
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `FramingError::ConnectionClosed` on EOF.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(frame);
            }
            if self.closed {
                return Err(FramingError::ConnectionClosed);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FramingError::Io(err)),
            };

            if read == 0 {
                self.closed = true;
                continue;
            }
            self.pending.extend(self.decoder.feed(&chunk[..read]));
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
}
