//! Verb/TLV wire protocol for fieldlink nodes.
//!
//! Every inner frame (post de-framing) is a fixed 4-byte header followed
//! by a TLV region:
//!
//! ```text
//! ┌──────────┬───────────┬──────────┬───────────┬──────────────────────┐
//! │ verb (1B)│ flags (1B)│ seq (1B) │ tlv_len   │ TLV records          │
//! │          │ always 0  │ 0=unsol. │ (1B)      │ (tag, len, value)*   │
//! └──────────┴───────────┴──────────┴───────────┴──────────────────────┘
//! ```
//!
//! Multi-byte integers are little-endian. The MSG verb reuses the length
//! byte for a raw text payload instead of TLV records.
//!
//! Verb and tag codes are a shared contract with the remote peer; they
//! must never be renumbered.

pub mod error;
pub mod frame;
pub mod tag;
pub mod tlv;
pub mod verb;

pub use error::{ProtoError, Result};
pub use frame::{FrameView, TlvIter, HEADER_SIZE};
pub use tag::{Tag, TagWidth};
pub use tlv::{read_le, FrameBuilder, LeValue, MAX_TLV_REGION};
pub use verb::Verb;
