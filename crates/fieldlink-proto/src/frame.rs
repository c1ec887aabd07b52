use crate::tag::Tag;
use crate::verb::Verb;

/// Inner frame header size: verb, flags, seq, length.
pub const HEADER_SIZE: usize = 4;

/// Borrowed view over one inner frame.
///
/// Parsing only requires the 4-byte header; the TLV region is validated
/// lazily so a frame with a lying length byte degrades to "region
/// malformed" rather than an out-of-bounds read.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Parse a frame. Returns `None` for anything shorter than a header.
    pub fn parse(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }
        Some(Self { bytes })
    }

    /// Raw verb byte (may be unknown).
    pub fn verb_raw(&self) -> u8 {
        self.bytes[0]
    }

    /// Decoded verb, if known.
    pub fn verb(&self) -> Option<Verb> {
        Verb::from_u8(self.bytes[0])
    }

    /// Flags byte (reserved, always 0 on the wire today).
    pub fn flags(&self) -> u8 {
        self.bytes[1]
    }

    /// Peer-chosen sequence number; 0 marks unsolicited frames.
    pub fn seq(&self) -> u8 {
        self.bytes[2]
    }

    /// Declared TLV region length (or raw payload length for MSG).
    pub fn tlv_len(&self) -> u8 {
        self.bytes[3]
    }

    /// The TLV region, or `None` when the declared length overruns the
    /// frame (structurally invalid).
    pub fn tlvs(&self) -> Option<&'a [u8]> {
        let end = HEADER_SIZE + self.tlv_len() as usize;
        if end > self.bytes.len() {
            return None;
        }
        Some(&self.bytes[HEADER_SIZE..end])
    }

    /// Raw payload for the MSG verb (same bytes as the TLV region; the
    /// length byte counts payload bytes instead of records).
    pub fn payload(&self) -> Option<&'a [u8]> {
        self.tlvs()
    }

    /// Find the first record with `tag`.
    ///
    /// The scan never reads past the declared region; a record whose
    /// length overruns the region ends the scan as not-found.
    pub fn find(&self, tag: Tag) -> Option<&'a [u8]> {
        self.iter().find(|(t, _)| *t == tag.code()).map(|(_, v)| v)
    }

    /// Iterate `(raw_tag, value)` records. Empty when the region is
    /// structurally invalid.
    pub fn iter(&self) -> TlvIter<'a> {
        TlvIter {
            region: self.tlvs().unwrap_or(&[]),
            offset: 0,
        }
    }
}

/// Bounds-checked iterator over the records of a TLV region.
#[derive(Debug)]
pub struct TlvIter<'a> {
    region: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset + 2 > self.region.len() {
            return None;
        }
        let tag = self.region[self.offset];
        let len = self.region[self.offset + 1] as usize;
        let start = self.offset + 2;
        if start + len > self.region.len() {
            // Declared length runs past the region: malformed, stop here.
            self.offset = self.region.len();
            return None;
        }
        self.offset = start + len;
        Some((tag, &self.region[start..start + len]))
    }
}
