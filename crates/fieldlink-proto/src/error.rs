/// Errors that can occur while building frames.
///
/// Decoding is fallible-by-`Option`: a malformed region means "not
/// found", never a panic, because inbound frames are untrusted.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// A TLV value exceeds the one-byte length field.
    #[error("TLV value too long ({len} bytes, max 255)")]
    ValueTooLong { len: usize },

    /// Appending a record would grow the TLV region past its ceiling.
    #[error("TLV region full (adding {need} bytes to {used}, max {max})")]
    RegionFull {
        need: usize,
        used: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
