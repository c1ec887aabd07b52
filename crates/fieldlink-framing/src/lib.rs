//! SLIP framing over unreliable byte streams.
//!
//! This layer turns an unbounded byte stream into delimited frames and
//! back. Every frame is wrapped in END (0xC0) delimiters, with in-band
//! END/ESC bytes escaped. Corrupted input degrades to "no frame this
//! tick": a bad escape or an oversized frame is discarded silently and
//! the decoder resynchronizes at the next delimiter.
//!
//! The layer knows nothing about payload semantics — verbs and TLVs live
//! upstream in `fieldlink-proto`.

pub mod error;
pub mod reader;
pub mod slip;
pub mod writer;

pub use error::{FramingError, Result};
pub use reader::SlipReader;
pub use slip::{encode, FramingConfig, SlipDecoder, DEFAULT_MAX_FRAME, END, ESC, ESC_END, ESC_ESC};
pub use writer::{FrameSink, SlipWriter};
