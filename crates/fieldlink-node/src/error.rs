use fieldlink_framing::FramingError;
use fieldlink_proto::ProtoError;

/// Errors surfaced by the interpreter and the link pump.
///
/// Malformed *input* is never an error — it degrades to a dropped frame
/// or a RESP_ERR on the wire. These variants cover the node's own
/// failures: a dead link or a response that cannot be encoded.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Sending a frame over the link failed.
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// Building a response frame failed.
    #[error(transparent)]
    Proto(#[from] ProtoError),
}

pub type Result<T> = std::result::Result<T, NodeError>;
