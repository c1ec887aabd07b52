use std::io::{Read, Write};

use fieldlink_framing::{FrameSink, FramingConfig, SlipReader, SlipWriter};
use fieldlink_proto::Verb;
use tracing::warn;

use crate::error::Result;
use crate::interface::NodeInterface;

/// Target for completed inbound frames.
///
/// The sentinel `Node` variant routes to the interpreter; `Custom`
/// replaces it wholesale (diagnostics shims, protocol sniffers). There
/// is exactly one target at a time.
pub enum Handler {
    /// Default: deliver to the node interpreter.
    Node,
    /// Replacement handler. Receives the decoded inner frame and a sink
    /// for any frames it wants to send back.
    Custom(Box<dyn FnMut(&[u8], &mut dyn FrameSink)>),
}

/// Owns the link connection and drives the framer on a polling tick.
///
/// `update()` must be called every scheduler tick. Handlers run
/// synchronously inside `update()`, one frame at a time, in arrival
/// order; a handler always completes before the next buffered frame is
/// dispatched. Inbound buffering is bounded by the OS stream buffer
/// plus one partial frame of `FramingConfig::max_frame_size` — starving
/// `update()` long enough to fill both drops traffic in the kernel, not
/// here.
pub struct LinkPump<R, W> {
    reader: SlipReader<R>,
    writer: SlipWriter<W>,
    node: NodeInterface,
    handler: Handler,
}

impl<R: Read, W: Write> LinkPump<R, W> {
    /// Build a pump over the link's read and write halves.
    ///
    /// The read half is expected to be in nonblocking mode (or to be a
    /// stream that never blocks `poll`, like a drained pipe in tests).
    pub fn new(read_half: R, write_half: W, node: NodeInterface) -> Self {
        Self::with_config(read_half, write_half, node, FramingConfig::default())
    }

    /// Build a pump with explicit framing configuration.
    pub fn with_config(
        read_half: R,
        write_half: W,
        node: NodeInterface,
        config: FramingConfig,
    ) -> Self {
        Self {
            reader: SlipReader::with_config(read_half, config.clone()),
            writer: SlipWriter::with_config(write_half, config),
            node,
            handler: Handler::Node,
        }
    }

    /// The node interpreter behind this pump.
    pub fn node(&self) -> &NodeInterface {
        &self.node
    }

    /// Mutable access to the node interpreter.
    pub fn node_mut(&mut self) -> &mut NodeInterface {
        &mut self.node
    }

    /// One tick: drain available bytes and dispatch completed frames.
    pub fn update(&mut self) -> Result<()> {
        let frames = self.reader.poll()?;
        for frame in frames {
            match &mut self.handler {
                Handler::Node => self.node.handle_frame(&frame, &mut self.writer)?,
                Handler::Custom(handler) => handler(&frame, &mut self.writer),
            }
        }
        Ok(())
    }

    /// Replace the frame handler; `None` restores the node interpreter.
    pub fn set_handler(&mut self, handler: Option<Box<dyn FnMut(&[u8], &mut dyn FrameSink)>>) {
        self.handler = match handler {
            Some(handler) => Handler::Custom(handler),
            None => Handler::Node,
        };
    }

    /// Send one complete inner frame over the link.
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.writer.send_frame(frame)?;
        Ok(())
    }

    /// Send a MSG frame with `text` as its raw payload (no TLV
    /// encoding). Text beyond 255 bytes is clamped.
    pub fn send_text(&mut self, text: &str) -> Result<()> {
        let payload = text.as_bytes();
        if payload.len() > 255 {
            warn!(len = payload.len(), "msg text clamped to 255 bytes");
        }
        let payload = &payload[..payload.len().min(255)];

        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.push(Verb::Msg.code());
        frame.push(0); // flags
        frame.push(0); // seq: unsolicited
        frame.push(payload.len() as u8);
        frame.extend_from_slice(payload);
        self.send(&frame)
    }

    /// Announce presence: the unsolicited hello frame.
    pub fn send_hello(&mut self) -> Result<()> {
        self.node.send_hello(&mut self.writer)
    }
}
