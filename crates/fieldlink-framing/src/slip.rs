use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

/// Frame delimiter.
pub const END: u8 = 0xC0;
/// Escape introducer.
pub const ESC: u8 = 0xDB;
/// Escaped substitute for an in-band END byte.
pub const ESC_END: u8 = 0xDC;
/// Escaped substitute for an in-band ESC byte.
pub const ESC_ESC: u8 = 0xDD;

/// Default maximum decoded frame size.
///
/// The inner protocol caps a frame at 4 header bytes plus a 255-byte
/// TLV region; 1 KiB leaves generous slack for future verbs without
/// letting a corrupt stream grow the assembly buffer unbounded.
pub const DEFAULT_MAX_FRAME: usize = 1024;

/// Configuration for the framing layer.
#[derive(Debug, Clone)]
pub struct FramingConfig {
    /// Maximum decoded frame size in bytes. Default: 1 KiB.
    ///
    /// This bounds per-connection memory: the decoder holds at most one
    /// partial frame of this size, and anything the OS stream buffer
    /// holds beyond that is still waiting in the kernel.
    pub max_frame_size: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME,
        }
    }
}

/// Encode one frame into the wire form: END, escaped payload, END.
///
/// The leading END flushes any line noise the receiver may have
/// accumulated since the previous frame.
pub fn encode(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(payload.len() + 2);
    dst.put_u8(END);
    for &b in payload {
        match b {
            END => {
                dst.put_u8(ESC);
                dst.put_u8(ESC_END);
            }
            ESC => {
                dst.put_u8(ESC);
                dst.put_u8(ESC_ESC);
            }
            _ => dst.put_u8(b),
        }
    }
    dst.put_u8(END);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Accumulating frame bytes.
    Accumulate,
    /// Previous byte was ESC; next byte selects the substitute.
    Escaped,
    /// Frame is poisoned; swallow bytes until the next END.
    Discard,
}

/// Incremental SLIP decoder.
///
/// Feed raw stream bytes in arbitrary chunks; completed frames come out.
/// Malformed sequences (bad escape, oversized frame) are dropped without
/// an error — the decoder resynchronizes at the next END delimiter.
#[derive(Debug)]
pub struct SlipDecoder {
    buf: BytesMut,
    state: DecodeState,
    max_frame_size: usize,
}

impl Default for SlipDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME)
    }
}

impl SlipDecoder {
    /// Create a decoder with an explicit frame size bound.
    pub fn new(max_frame_size: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            state: DecodeState::Accumulate,
            max_frame_size,
        }
    }

    /// Push stream bytes, returning any frames completed by this chunk.
    ///
    /// Back-to-back END delimiters produce no frame (empty frames are
    /// a sync idiom on the wire, not messages).
    pub fn feed(&mut self, data: &[u8]) -> Vec<Bytes> {
        let mut frames = Vec::new();
        for &b in data {
            match self.state {
                DecodeState::Accumulate => match b {
                    END => {
                        if !self.buf.is_empty() {
                            frames.push(self.buf.split().freeze());
                        }
                    }
                    ESC => self.state = DecodeState::Escaped,
                    _ => self.push_byte(b),
                },
                DecodeState::Escaped => {
                    self.state = DecodeState::Accumulate;
                    match b {
                        ESC_END => self.push_byte(END),
                        ESC_ESC => self.push_byte(ESC),
                        _ => {
                            trace!(byte = b, "invalid escape sequence, discarding frame");
                            self.poison();
                        }
                    }
                }
                DecodeState::Discard => {
                    if b == END {
                        self.state = DecodeState::Accumulate;
                    }
                }
            }
        }
        frames
    }

    /// Bytes currently held in the partial-frame buffer.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    fn push_byte(&mut self, b: u8) {
        if self.buf.len() >= self.max_frame_size {
            trace!(max = self.max_frame_size, "frame exceeds size bound, discarding");
            self.poison();
            return;
        }
        self.buf.put_u8(b);
    }

    fn poison(&mut self) {
        self.buf.clear();
        self.state = DecodeState::Discard;
    }
}
