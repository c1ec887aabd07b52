use std::path::Path;
use std::time::Duration;

use fieldlink_framing::{SlipReader, SlipWriter};
use fieldlink_proto::FrameView;
use fieldlink_transport::{LinkSocket, LinkStream};
use tracing::debug;

use crate::exit::{framing_error, transport_error, CliError, CliResult, USAGE};

/// Client end of the control link: sends one request at a time and
/// waits for the response with the matching sequence number.
pub struct LinkClient {
    reader: SlipReader<LinkStream>,
    writer: SlipWriter<LinkStream>,
    seq: u8,
}

impl LinkClient {
    /// Connect to a node's socket with a response timeout.
    pub fn connect(path: &Path, timeout: Duration) -> CliResult<Self> {
        let stream =
            LinkSocket::connect(path).map_err(|err| transport_error("connect failed", err))?;
        stream
            .set_read_timeout(Some(timeout))
            .map_err(|err| transport_error("set timeout failed", err))?;
        let write_half = stream
            .try_clone()
            .map_err(|err| transport_error("clone stream failed", err))?;

        Ok(Self {
            reader: SlipReader::new(stream),
            writer: SlipWriter::new(write_half),
            seq: 0,
        })
    }

    /// Send the frame produced by `build` (handed a fresh nonzero seq)
    /// and return the response carrying that seq.
    ///
    /// Unsolicited frames (seq 0, e.g. the node's hello) and stale
    /// responses are skipped.
    pub fn exchange(&mut self, build: impl FnOnce(u8) -> Vec<u8>) -> CliResult<Vec<u8>> {
        self.seq = self.seq.wrapping_add(1);
        if self.seq == 0 {
            self.seq = 1;
        }
        let seq = self.seq;

        let request = build(seq);
        self.writer
            .send(&request)
            .map_err(|err| framing_error("send failed", err))?;

        loop {
            let frame = self
                .reader
                .read_frame()
                .map_err(|err| framing_error("receive failed", err))?;
            let Some(view) = FrameView::parse(&frame) else {
                continue;
            };
            if view.seq() == seq {
                return Ok(frame.to_vec());
            }
            debug!(seq = view.seq(), "skipping out-of-band frame");
        }
    }
}

/// Parse `5s` / `500ms` / bare seconds.
pub fn parse_duration(text: &str) -> CliResult<Duration> {
    let text = text.trim();
    let parsed = if let Some(ms) = text.strip_suffix("ms") {
        ms.trim().parse::<u64>().map(Duration::from_millis)
    } else if let Some(secs) = text.strip_suffix('s') {
        secs.trim().parse::<u64>().map(Duration::from_secs)
    } else {
        text.parse::<u64>().map(Duration::from_secs)
    };
    parsed.map_err(|_| CliError::new(USAGE, format!("invalid duration: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("").is_err());
    }
}
