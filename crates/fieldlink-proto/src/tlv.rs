use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtoError, Result};
use crate::frame::HEADER_SIZE;
use crate::tag::Tag;
use crate::verb::Verb;

/// Hard ceiling on the TLV region: the header's length field is one byte.
pub const MAX_TLV_REGION: usize = 255;

/// Fixed-width little-endian wire integer.
///
/// Decoding is exact-width: a short or long field is a decode failure,
/// not a best-effort parse.
pub trait LeValue: Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;
    /// Append the little-endian encoding.
    fn put_le(self, dst: &mut BytesMut);
    /// Decode from exactly `WIDTH` bytes.
    fn from_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_le_value {
    ($($ty:ty),*) => {
        $(
            impl LeValue for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn put_le(self, dst: &mut BytesMut) {
                    dst.put_slice(&self.to_le_bytes());
                }

                fn from_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_le_value!(u8, i8, u16, i16, u32, i32);

/// Decode a fixed-width little-endian integer from a TLV value.
///
/// Returns `None` unless `value` is exactly the integer's width.
pub fn read_le<T: LeValue>(value: &[u8]) -> Option<T> {
    if value.len() != T::WIDTH {
        return None;
    }
    Some(T::from_le(value))
}

/// Builds one inner frame: header first, TLV records appended, length
/// patched on `finish()`.
///
/// The 255-byte TLV region ceiling is enforced on every append; an
/// overflowing `put` is an error, never a silent truncation.
#[derive(Debug)]
pub struct FrameBuilder {
    buf: BytesMut,
}

impl FrameBuilder {
    /// Start a frame: verb, zero flags, seq, zero length placeholder.
    pub fn new(verb: Verb, seq: u8) -> Self {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + 64);
        buf.put_u8(verb.code());
        buf.put_u8(0); // flags, reserved
        buf.put_u8(seq);
        buf.put_u8(0); // length patched in finish()
        Self { buf }
    }

    /// Append a record with a raw tag code (unknown-tag test traffic and
    /// forward-compatible callers).
    pub fn put_raw(&mut self, tag: u8, value: &[u8]) -> Result<()> {
        if value.len() > MAX_TLV_REGION {
            return Err(ProtoError::ValueTooLong { len: value.len() });
        }
        let used = self.buf.len() - HEADER_SIZE;
        let need = 2 + value.len();
        if used + need > MAX_TLV_REGION {
            return Err(ProtoError::RegionFull {
                need,
                used,
                max: MAX_TLV_REGION,
            });
        }
        self.buf.put_u8(tag);
        self.buf.put_u8(value.len() as u8);
        self.buf.put_slice(value);
        Ok(())
    }

    /// Append a record: tag, length, raw value bytes.
    pub fn put(&mut self, tag: Tag, value: &[u8]) -> Result<()> {
        self.put_raw(tag.code(), value)
    }

    /// Append a record holding a little-endian fixed-width integer.
    pub fn put_le<T: LeValue>(&mut self, tag: Tag, value: T) -> Result<()> {
        let mut tmp = BytesMut::with_capacity(T::WIDTH);
        value.put_le(&mut tmp);
        self.put(tag, &tmp)
    }

    /// Append a string value as raw bytes (no NUL terminator).
    pub fn put_str(&mut self, tag: Tag, value: &str) -> Result<()> {
        self.put(tag, value.as_bytes())
    }

    /// Current TLV region length in bytes.
    pub fn region_len(&self) -> usize {
        self.buf.len() - HEADER_SIZE
    }

    /// Patch the header length field and return the completed frame.
    pub fn finish(mut self) -> Bytes {
        let region = self.buf.len() - HEADER_SIZE;
        debug_assert!(region <= MAX_TLV_REGION);
        self.buf[3] = region as u8;
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameView;

    #[test]
    fn header_layout() {
        let frame = FrameBuilder::new(Verb::RespOk, 7).finish();
        assert_eq!(frame.as_ref(), &[0x90, 0x00, 0x07, 0x00]);
    }

    #[test]
    fn put_and_find_round_trip() {
        let mut b = FrameBuilder::new(Verb::RespOk, 1);
        b.put_str(Tag::Id, "N30").unwrap();
        b.put_le::<u32>(Tag::FreqHz, 915_000_000).unwrap();
        let frame = b.finish();

        let view = FrameView::parse(&frame).unwrap();
        assert_eq!(view.find(Tag::Id), Some(b"N30".as_ref()));
        let freq = view.find(Tag::FreqHz).and_then(read_le::<u32>);
        assert_eq!(freq, Some(915_000_000));
    }

    #[test]
    fn le_values_round_trip() {
        let mut b = FrameBuilder::new(Verb::RespOk, 0);
        b.put_le::<i8>(Tag::TxPwrDbm, -3).unwrap();
        b.put_le::<i16>(Tag::RssiDbm, -42).unwrap();
        b.put_le::<u16>(Tag::BufSize, 0xBEEF).unwrap();
        let frame = b.finish();

        let view = FrameView::parse(&frame).unwrap();
        assert_eq!(view.find(Tag::TxPwrDbm).and_then(read_le::<i8>), Some(-3));
        assert_eq!(view.find(Tag::RssiDbm).and_then(read_le::<i16>), Some(-42));
        assert_eq!(view.find(Tag::BufSize).and_then(read_le::<u16>), Some(0xBEEF));
    }

    #[test]
    fn read_le_requires_exact_width() {
        assert_eq!(read_le::<u32>(&[1, 0, 0]), None);
        assert_eq!(read_le::<u32>(&[1, 0, 0, 0, 0]), None);
        assert_eq!(read_le::<u32>(&[1, 0, 0, 0]), Some(1u32));
        assert_eq!(read_le::<u8>(&[]), None);
    }

    #[test]
    fn finish_patches_length() {
        let mut b = FrameBuilder::new(Verb::RespOk, 3);
        b.put_str(Tag::Alias, "basecamp").unwrap();
        let frame = b.finish();
        assert_eq!(frame[3] as usize, 2 + 8);
        assert_eq!(frame.len(), 4 + 2 + 8);
    }

    #[test]
    fn value_longer_than_length_field_rejected() {
        let mut b = FrameBuilder::new(Verb::RespOk, 0);
        let big = vec![0u8; 256];
        assert!(matches!(
            b.put(Tag::Alias, &big),
            Err(ProtoError::ValueTooLong { .. })
        ));
    }

    #[test]
    fn region_ceiling_is_enforced() {
        let mut b = FrameBuilder::new(Verb::RespOk, 0);
        // Five records of 2+49 bytes fill the region to exactly 255.
        for _ in 0..5 {
            b.put(Tag::Alias, &[0u8; 49]).unwrap();
        }
        assert_eq!(b.region_len(), 255);
        let err = b.put(Tag::Alias, &[]).unwrap_err();
        assert!(matches!(err, ProtoError::RegionFull { .. }));
    }
}
