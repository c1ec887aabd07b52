//! Byte-stream transport for the fieldlink control link.
//!
//! A fieldlink node talks SLIP over a dumb byte stream. On the real
//! hardware that stream is a UART; on a host this crate provides a Unix
//! domain socket stand-in with the same shape: an unstructured,
//! connection-oriented stream of bytes with no framing of its own.

pub mod error;
pub mod socket;
pub mod stream;

pub use error::{Result, TransportError};
pub use socket::LinkSocket;
pub use stream::LinkStream;

/// Conventional link speed for the embedded variant, in baud.
///
/// A socket transport has no baud rate; the constant exists so host and
/// firmware builds agree on the default when one is opening a real UART.
pub const DEFAULT_BAUD: u32 = 115_200;
