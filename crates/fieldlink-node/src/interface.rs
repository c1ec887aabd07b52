use std::time::{Instant, SystemTime, UNIX_EPOCH};

use fieldlink_framing::FrameSink;
use fieldlink_proto::tag::ALL_TAGS;
use fieldlink_proto::{read_le, FrameBuilder, FrameView, Tag, Verb};
use tracing::{debug, info, warn};

use crate::config::{
    is_valid_ack, is_valid_cr, is_valid_id, is_valid_sf, NodeConfig, MAX_ALIAS_LEN, MAX_ID_LEN,
    MAX_TEXT_LEN,
};
use crate::diag::{DiagSnapshot, DiagSource};
use crate::display::StatusDisplay;
use crate::error::Result;
use crate::store::SettingsStore;

/// Settings namespace used for persistence.
const SETTINGS_NAMESPACE: &str = "fieldlink";

const FW_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The protocol state machine.
///
/// Owns the device configuration and handles one complete inner frame
/// per [`NodeInterface::handle_frame`] call: decode, validate, mutate,
/// respond. Responses go out through the [`FrameSink`] passed in by the
/// pump, so the interpreter never owns the link itself.
pub struct NodeInterface {
    config: NodeConfig,
    store: Box<dyn SettingsStore>,
    store_open: bool,
    display: Box<dyn StatusDisplay>,
    diag: Box<dyn DiagSource>,
    last_text: String,
    started: Instant,
    boot_epoch: u32,
}

impl NodeInterface {
    /// Wire up collaborators. Call [`NodeInterface::begin`] before use.
    pub fn new(
        store: Box<dyn SettingsStore>,
        display: Box<dyn StatusDisplay>,
        diag: Box<dyn DiagSource>,
    ) -> Self {
        Self {
            config: NodeConfig::default(),
            store,
            store_open: false,
            display,
            diag,
            last_text: String::new(),
            started: Instant::now(),
            boot_epoch: 0,
        }
    }

    /// Boot: open storage, load persisted settings over defaults, draw
    /// the boot and ID screens.
    ///
    /// Safe to call once at startup. A store that fails to open leaves
    /// the node on defaults; it keeps answering requests, just without
    /// durability.
    pub fn begin(&mut self) {
        self.started = Instant::now();
        self.boot_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);

        self.store_open = self.store.open(SETTINGS_NAMESPACE);
        if self.store_open {
            self.config = NodeConfig::load_from(self.store.as_ref());
        } else {
            warn!("settings storage unavailable, running on defaults");
        }

        info!(id = %self.config.id, "node interface up");
        self.display.draw_boot("booting");
        self.display.draw_id(&self.config.id);
    }

    /// Current node ID.
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Last received MSG text (empty if none).
    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    /// Current configuration state.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The settings store (primarily for inspection in tests and
    /// diagnostics surfaces).
    pub fn store(&self) -> &dyn SettingsStore {
        self.store.as_ref()
    }

    /// Send the unsolicited hello: RESP_OK, seq=0, current ID only.
    ///
    /// Announced at boot and again after a successful SET_ID.
    pub fn send_hello(&mut self, sink: &mut dyn FrameSink) -> Result<()> {
        let mut b = FrameBuilder::new(Verb::RespOk, 0);
        b.put_str(Tag::Id, &self.config.id)?;
        sink.send_frame(&b.finish())?;
        Ok(())
    }

    /// Handle one complete inner frame.
    ///
    /// Frames shorter than a header are dropped without a response.
    /// Every other frame gets exactly one response (SET_ID additionally
    /// emits the hello as a separate frame).
    pub fn handle_frame(&mut self, frame: &[u8], sink: &mut dyn FrameSink) -> Result<()> {
        let Some(view) = FrameView::parse(frame) else {
            debug!(len = frame.len(), "dropping short frame");
            return Ok(());
        };
        let seq = view.seq();

        match view.verb() {
            Some(Verb::GetId) | Some(Verb::Ping) => self.reply_with_id(seq, sink),
            Some(Verb::SetId) => self.handle_set_id(view, seq, sink),
            Some(Verb::GetParam) => self.handle_get_param(view, seq, sink),
            Some(Verb::SetParam) => self.handle_set_param(view, seq, sink),
            Some(Verb::GetAll) => self.handle_get_all(seq, sink),
            Some(Verb::Msg) => self.handle_msg(view, seq, sink),
            Some(Verb::RespOk) | Some(Verb::RespErr) | None => {
                debug!(verb = view.verb_raw(), "unhandled verb");
                self.send_err(seq, sink)
            }
        }
    }

    fn reply_with_id(&mut self, seq: u8, sink: &mut dyn FrameSink) -> Result<()> {
        let mut b = FrameBuilder::new(Verb::RespOk, seq);
        b.put_str(Tag::Id, &self.config.id)?;
        sink.send_frame(&b.finish())?;
        Ok(())
    }

    fn send_err(&mut self, seq: u8, sink: &mut dyn FrameSink) -> Result<()> {
        let b = FrameBuilder::new(Verb::RespErr, seq);
        sink.send_frame(&b.finish())?;
        Ok(())
    }

    fn handle_set_id(&mut self, view: FrameView<'_>, seq: u8, sink: &mut dyn FrameSink) -> Result<()> {
        let Some(raw) = view.find(Tag::Id) else {
            return self.send_err(seq, sink);
        };
        if raw.is_empty() {
            return self.send_err(seq, sink);
        }

        // Clamp to capacity before validating, so an overlong value is
        // truncated rather than rejected outright.
        let clamped = &raw[..raw.len().min(MAX_ID_LEN)];
        let id = match std::str::from_utf8(clamped) {
            Ok(id) if is_valid_id(id) => id.to_string(),
            _ => {
                debug!("rejecting invalid node id");
                return self.send_err(seq, sink);
            }
        };

        self.config.id = id;
        self.persist();
        self.display.draw_id(&self.config.id);
        info!(id = %self.config.id, "node id updated");

        self.reply_with_id(seq, sink)?;
        self.send_hello(sink)
    }

    fn handle_get_param(
        &mut self,
        view: FrameView<'_>,
        seq: u8,
        sink: &mut dyn FrameSink,
    ) -> Result<()> {
        if view.tlvs().is_none() {
            return self.send_err(seq, sink);
        }

        let diag = self.diag.snapshot();
        let mut b = FrameBuilder::new(Verb::RespOk, seq);
        for (raw_tag, value) in view.iter() {
            // A zero-length record means "please return this tag";
            // records carrying bytes are skipped.
            if !value.is_empty() {
                continue;
            }
            let Some(tag) = Tag::from_u8(raw_tag) else {
                continue;
            };
            self.emit_tag(&mut b, tag, &diag)?;
        }
        sink.send_frame(&b.finish())?;
        Ok(())
    }

    fn handle_set_param(
        &mut self,
        view: FrameView<'_>,
        seq: u8,
        sink: &mut dyn FrameSink,
    ) -> Result<()> {
        if view.tlvs().is_none() {
            return self.send_err(seq, sink);
        }

        // All-or-nothing: stage every change against a scratch copy and
        // commit only if the whole request validates.
        let mut staged = self.config.clone();
        for (raw_tag, value) in view.iter() {
            let Some(tag) = Tag::from_u8(raw_tag) else {
                continue; // unknown tags are ignored, not errors
            };
            if !apply_param(&mut staged, tag, value) {
                debug!(tag = raw_tag, "set rejected");
                return self.send_err(seq, sink);
            }
        }

        self.config = staged;
        self.persist();

        let diag = self.diag.snapshot();
        let mut b = FrameBuilder::new(Verb::RespOk, seq);
        for tag in ALL_TAGS.iter().copied().filter(|t| t.is_settable()) {
            self.emit_tag(&mut b, tag, &diag)?;
        }
        sink.send_frame(&b.finish())?;
        Ok(())
    }

    /// GET_ALL emits every known tag in ascending tag-code order:
    /// identity/system, radio, behavior, diagnostics.
    fn handle_get_all(&mut self, seq: u8, sink: &mut dyn FrameSink) -> Result<()> {
        let diag = self.diag.snapshot();
        let mut b = FrameBuilder::new(Verb::RespOk, seq);
        for tag in ALL_TAGS {
            self.emit_tag(&mut b, tag, &diag)?;
        }
        sink.send_frame(&b.finish())?;
        Ok(())
    }

    fn handle_msg(&mut self, view: FrameView<'_>, seq: u8, sink: &mut dyn FrameSink) -> Result<()> {
        let Some(payload) = view.payload() else {
            return self.send_err(seq, sink);
        };

        let clamped = &payload[..payload.len().min(MAX_TEXT_LEN)];
        self.last_text = String::from_utf8_lossy(clamped).into_owned();

        if self.display.available() {
            self.display.draw_two_lines("RX Msg:", &self.last_text);
        }
        info!(text = %self.last_text, "rx msg");

        self.reply_with_id(seq, sink)
    }

    /// Append the current value of `tag` to a response.
    fn emit_tag(
        &self,
        b: &mut FrameBuilder,
        tag: Tag,
        diag: &DiagSnapshot,
    ) -> fieldlink_proto::Result<()> {
        let c = &self.config;
        match tag {
            Tag::Id => b.put_str(tag, &c.id),
            Tag::Alias => b.put_str(tag, &c.alias),
            Tag::FwVersion => b.put_str(tag, FW_VERSION),
            Tag::UptimeS => b.put_le::<u32>(tag, self.uptime_s()),
            Tag::BootTime => b.put_le::<u32>(tag, self.boot_epoch),

            Tag::FreqHz => b.put_le::<u32>(tag, c.freq_hz),
            Tag::Sf => b.put_le::<u8>(tag, c.sf),
            Tag::BwHz => b.put_le::<u32>(tag, c.bw_hz),
            Tag::Cr => b.put_le::<u8>(tag, c.cr),
            Tag::TxPwrDbm => b.put_le::<i8>(tag, c.tx_pwr_dbm),
            Tag::Chan => b.put_le::<u8>(tag, c.chan),

            Tag::Mode => b.put_le::<u8>(tag, c.mode),
            Tag::Hops => b.put_le::<u8>(tag, c.hops),
            Tag::BeaconSec => b.put_le::<u32>(tag, c.beacon_s),
            Tag::BufSize => b.put_le::<u16>(tag, c.buf_size),
            Tag::AckMode => b.put_le::<u8>(tag, c.ack_mode),

            Tag::RssiDbm => b.put_le::<i16>(tag, diag.rssi_dbm),
            Tag::SnrDb => b.put_le::<i8>(tag, diag.snr_db),
            Tag::VbatMv => b.put_le::<u16>(tag, diag.vbat_mv),
            Tag::TempC10 => b.put_le::<i16>(tag, diag.temp_c10),
            Tag::FreeMem => b.put_le::<u32>(tag, diag.free_mem),
            Tag::FreeFlash => b.put_le::<u32>(tag, diag.free_flash),
            Tag::LogCount => b.put_le::<u16>(tag, diag.log_count),
        }
    }

    fn uptime_s(&self) -> u32 {
        self.started.elapsed().as_secs() as u32
    }

    /// Persist the current configuration.
    ///
    /// Storage being unavailable is deliberately not surfaced on the
    /// wire: the peer still sees RESP_OK and the change holds in memory.
    fn persist(&mut self) {
        if !self.store_open {
            self.store_open = self.store.open(SETTINGS_NAMESPACE);
            if !self.store_open {
                warn!("settings storage unavailable, change is not durable");
                return;
            }
        }
        self.config.persist_to(self.store.as_mut());
    }
}

/// Decode and range-check one SET_PARAM record against the staged
/// config. Returns false on a decode or validation failure; recognized
/// but non-settable tags (ID, diagnostics, runtime fields) are ignored.
fn apply_param(staged: &mut NodeConfig, tag: Tag, value: &[u8]) -> bool {
    match tag {
        Tag::Alias => {
            let clamped = &value[..value.len().min(MAX_ALIAS_LEN)];
            match std::str::from_utf8(clamped) {
                Ok(alias) => {
                    staged.alias = alias.to_string();
                    true
                }
                Err(_) => false,
            }
        }
        Tag::FreqHz => read_field(value, &mut staged.freq_hz),
        Tag::Sf => match read_le::<u8>(value) {
            Some(v) if is_valid_sf(v) => {
                staged.sf = v;
                true
            }
            _ => false,
        },
        Tag::BwHz => read_field(value, &mut staged.bw_hz),
        Tag::Cr => match read_le::<u8>(value) {
            Some(v) if is_valid_cr(v) => {
                staged.cr = v;
                true
            }
            _ => false,
        },
        Tag::TxPwrDbm => read_field(value, &mut staged.tx_pwr_dbm),
        Tag::Chan => read_field(value, &mut staged.chan),
        Tag::Mode => read_field(value, &mut staged.mode),
        Tag::Hops => read_field(value, &mut staged.hops),
        Tag::BeaconSec => read_field(value, &mut staged.beacon_s),
        Tag::BufSize => read_field(value, &mut staged.buf_size),
        Tag::AckMode => match read_le::<u8>(value) {
            Some(v) if is_valid_ack(v) => {
                staged.ack_mode = v;
                true
            }
            _ => false,
        },
        // Not settable here: the ID has its own verb, the rest are
        // runtime- or sensor-sourced.
        _ => true,
    }
}

fn read_field<T: fieldlink_proto::LeValue>(value: &[u8], out: &mut T) -> bool {
    match read_le::<T>(value) {
        Some(v) => {
            *out = v;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use fieldlink_framing::FrameSink;
    use fieldlink_proto::{read_le, FrameBuilder, FrameView, Tag, Verb};

    use super::*;
    use crate::diag::StubDiag;
    use crate::display::NullDisplay;
    use crate::store::MemorySettingsStore;

    #[derive(Default)]
    struct CaptureSink {
        frames: Vec<Vec<u8>>,
    }

    impl FrameSink for CaptureSink {
        fn send_frame(&mut self, frame: &[u8]) -> fieldlink_framing::Result<()> {
            self.frames.push(frame.to_vec());
            Ok(())
        }
    }

    fn node() -> NodeInterface {
        node_with_store(MemorySettingsStore::new())
    }

    fn node_with_store(store: MemorySettingsStore) -> NodeInterface {
        let mut node = NodeInterface::new(
            Box::new(store),
            Box::new(NullDisplay),
            Box::new(StubDiag),
        );
        node.begin();
        node
    }

    fn handle(node: &mut NodeInterface, frame: &[u8]) -> Vec<Vec<u8>> {
        let mut sink = CaptureSink::default();
        node.handle_frame(frame, &mut sink).unwrap();
        sink.frames
    }

    fn view(frame: &[u8]) -> FrameView<'_> {
        FrameView::parse(frame).unwrap()
    }

    #[test]
    fn short_frame_is_dropped_silently() {
        let mut node = node();
        assert!(handle(&mut node, &[0x01, 0x00]).is_empty());
    }

    #[test]
    fn get_id_and_ping_answer_with_id() {
        let mut node = node();
        for verb in [Verb::GetId, Verb::Ping] {
            let request = FrameBuilder::new(verb, 5).finish();
            let frames = handle(&mut node, &request);
            assert_eq!(frames.len(), 1);
            let resp = view(&frames[0]);
            assert_eq!(resp.verb(), Some(Verb::RespOk));
            assert_eq!(resp.seq(), 5);
            assert_eq!(resp.find(Tag::Id), Some(b"HckrMn".as_ref()));
        }
    }

    #[test]
    fn get_id_is_idempotent() {
        let mut node = node();
        let request = FrameBuilder::new(Verb::GetId, 9).finish();
        let first = handle(&mut node, &request);
        let second = handle(&mut node, &request);
        assert_eq!(first, second);
    }

    #[test]
    fn set_id_commits_persists_and_emits_hello() {
        let mut node = node();
        let mut b = FrameBuilder::new(Verb::SetId, 3);
        b.put_str(Tag::Id, "N30").unwrap();
        let frames = handle(&mut node, &b.finish());

        // Response plus a separate hello.
        assert_eq!(frames.len(), 2);
        let resp = view(&frames[0]);
        assert_eq!(resp.verb(), Some(Verb::RespOk));
        assert_eq!(resp.seq(), 3);
        assert_eq!(resp.find(Tag::Id), Some(b"N30".as_ref()));

        let hello = view(&frames[1]);
        assert_eq!(hello.verb(), Some(Verb::RespOk));
        assert_eq!(hello.seq(), 0);
        assert_eq!(hello.find(Tag::Id), Some(b"N30".as_ref()));

        // State and persistence both updated.
        assert_eq!(node.id(), "N30");
        assert_eq!(node.store().get_string("id", ""), "N30");

        // A following GET_ID sees the new ID.
        let frames = handle(&mut node, &FrameBuilder::new(Verb::GetId, 4).finish());
        assert_eq!(view(&frames[0]).find(Tag::Id), Some(b"N30".as_ref()));
    }

    #[test]
    fn set_id_rejects_bad_charset_without_mutation() {
        let mut node = node();
        let mut b = FrameBuilder::new(Verb::SetId, 6);
        b.put_str(Tag::Id, "bad id").unwrap();
        let frames = handle(&mut node, &b.finish());

        assert_eq!(frames.len(), 1);
        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespErr));
        assert_eq!(view(&frames[0]).seq(), 6);

        assert_eq!(node.id(), "HckrMn");
        assert!(node.store().get_string("id", "").is_empty());
    }

    #[test]
    fn set_id_without_tag_or_empty_is_an_error() {
        let mut node = node();

        let frames = handle(&mut node, &FrameBuilder::new(Verb::SetId, 1).finish());
        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespErr));

        let mut b = FrameBuilder::new(Verb::SetId, 2);
        b.put(Tag::Id, b"").unwrap();
        let frames = handle(&mut node, &b.finish());
        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespErr));
    }

    #[test]
    fn set_id_clamps_overlong_value_to_capacity() {
        let mut node = node();
        let long = "x".repeat(40);
        let mut b = FrameBuilder::new(Verb::SetId, 7);
        b.put_str(Tag::Id, &long).unwrap();
        let frames = handle(&mut node, &b.finish());

        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespOk));
        assert_eq!(node.id(), "x".repeat(31));
    }

    #[test]
    fn get_param_returns_requested_tags_in_request_order() {
        let mut node = node();
        let mut b = FrameBuilder::new(Verb::GetParam, 8);
        b.put(Tag::Sf, b"").unwrap();
        b.put(Tag::Mode, b"").unwrap();
        let frames = handle(&mut node, &b.finish());

        let resp = view(&frames[0]);
        assert_eq!(resp.verb(), Some(Verb::RespOk));
        let records: Vec<(u8, Vec<u8>)> = resp.iter().map(|(t, v)| (t, v.to_vec())).collect();
        assert_eq!(
            records,
            vec![(Tag::Sf.code(), vec![9]), (Tag::Mode.code(), vec![0])]
        );
    }

    #[test]
    fn get_param_skips_records_with_values_and_unknown_tags() {
        let mut node = node();
        let mut b = FrameBuilder::new(Verb::GetParam, 2);
        b.put_le::<u8>(Tag::Sf, 10).unwrap(); // nonzero length: skipped
        b.put_raw(0x7E, b"").unwrap(); // unknown tag: ignored
        b.put(Tag::Chan, b"").unwrap();
        let frames = handle(&mut node, &b.finish());

        let resp = view(&frames[0]);
        let tags: Vec<u8> = resp.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec![Tag::Chan.code()]);
    }

    #[test]
    fn set_param_applies_validates_and_echoes_settable_tags() {
        let mut node = node();
        let mut b = FrameBuilder::new(Verb::SetParam, 4);
        b.put_le::<u8>(Tag::Sf, 11).unwrap();
        b.put_le::<u32>(Tag::FreqHz, 868_000_000).unwrap();
        b.put_str(Tag::Alias, "ridge").unwrap();
        let frames = handle(&mut node, &b.finish());

        let resp = view(&frames[0]);
        assert_eq!(resp.verb(), Some(Verb::RespOk));
        assert_eq!(resp.seq(), 4);

        // Echo carries every settable tag with final values.
        let tags: Vec<u8> = resp.iter().map(|(t, _)| t).collect();
        assert_eq!(
            tags,
            vec![0x02, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x20, 0x21, 0x22, 0x23, 0x24]
        );
        assert_eq!(resp.find(Tag::Sf).and_then(read_le::<u8>), Some(11));
        assert_eq!(
            resp.find(Tag::FreqHz).and_then(read_le::<u32>),
            Some(868_000_000)
        );
        assert_eq!(resp.find(Tag::Alias), Some(b"ridge".as_ref()));

        assert_eq!(node.config().sf, 11);
        assert_eq!(node.config().freq_hz, 868_000_000);
        assert_eq!(node.store().get_uint("sf", 0), 11);
    }

    #[test]
    fn set_param_out_of_range_sf_rejected_without_any_mutation() {
        let mut node = node();
        // Valid frequency first, invalid SF second: nothing may apply.
        let mut b = FrameBuilder::new(Verb::SetParam, 5);
        b.put_le::<u32>(Tag::FreqHz, 868_000_000).unwrap();
        b.put_le::<u8>(Tag::Sf, 13).unwrap();
        let frames = handle(&mut node, &b.finish());

        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespErr));
        assert_eq!(node.config().sf, 9);
        assert_eq!(node.config().freq_hz, 915_000_000);
        assert_eq!(node.store().get_uint("sf", 0), 0, "nothing persisted");

        // A following GET_PARAM still reports the previous value.
        let mut b = FrameBuilder::new(Verb::GetParam, 6);
        b.put(Tag::Sf, b"").unwrap();
        let frames = handle(&mut node, &b.finish());
        assert_eq!(view(&frames[0]).find(Tag::Sf).and_then(read_le::<u8>), Some(9));
    }

    #[test]
    fn set_param_wrong_width_is_a_decode_failure() {
        let mut node = node();
        // FreqHz wants 4 bytes; give it 2.
        let mut b = FrameBuilder::new(Verb::SetParam, 9);
        b.put(Tag::FreqHz, &[0x10, 0x27]).unwrap();
        let frames = handle(&mut node, &b.finish());
        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespErr));
        assert_eq!(node.config().freq_hz, 915_000_000);
    }

    #[test]
    fn set_param_ignores_unknown_and_non_settable_tags() {
        let mut node = node();
        let mut b = FrameBuilder::new(Verb::SetParam, 7);
        b.put_raw(0x7E, &[1, 2, 3]).unwrap(); // unknown
        b.put_le::<i16>(Tag::RssiDbm, -99).unwrap(); // diagnostics, read-only
        b.put_le::<u8>(Tag::Chan, 4).unwrap();
        let frames = handle(&mut node, &b.finish());

        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespOk));
        assert_eq!(node.config().chan, 4);
    }

    #[test]
    fn set_param_clamps_overlong_alias() {
        let mut node = node();
        let long = "y".repeat(40);
        let mut b = FrameBuilder::new(Verb::SetParam, 2);
        b.put_str(Tag::Alias, &long).unwrap();
        let frames = handle(&mut node, &b.finish());

        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespOk));
        assert_eq!(node.config().alias, "y".repeat(31));
    }

    #[test]
    fn get_all_emits_every_tag_in_code_order() {
        let mut node = node();
        let frames = handle(&mut node, &FrameBuilder::new(Verb::GetAll, 1).finish());

        let resp = view(&frames[0]);
        assert_eq!(resp.verb(), Some(Verb::RespOk));
        let tags: Vec<u8> = resp.iter().map(|(t, _)| t).collect();
        let expected: Vec<u8> = ALL_TAGS.iter().map(|t| t.code()).collect();
        assert_eq!(tags, expected);

        // Spot-check a few values, including diagnostics stubs.
        assert_eq!(resp.find(Tag::Id), Some(b"HckrMn".as_ref()));
        assert_eq!(resp.find(Tag::VbatMv).and_then(read_le::<u16>), Some(3700));
        assert_eq!(resp.find(Tag::RssiDbm).and_then(read_le::<i16>), Some(-42));
        assert_eq!(
            resp.find(Tag::FwVersion),
            Some(env!("CARGO_PKG_VERSION").as_bytes())
        );
    }

    #[test]
    fn msg_stores_text_and_answers_with_id() {
        let mut node = node();
        let mut frame = vec![Verb::Msg.code(), 0, 0x21, 5];
        frame.extend_from_slice(b"hello");
        let frames = handle(&mut node, &frame);

        assert_eq!(node.last_text(), "hello");
        let resp = view(&frames[0]);
        assert_eq!(resp.verb(), Some(Verb::RespOk));
        assert_eq!(resp.seq(), 0x21);
        assert_eq!(resp.find(Tag::Id), Some(b"HckrMn".as_ref()));
    }

    #[test]
    fn msg_truncated_payload_is_an_error() {
        let mut node = node();
        let frame = [Verb::Msg.code(), 0, 1, 10, b'h', b'i'];
        let frames = handle(&mut node, &frame);
        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespErr));
        assert_eq!(node.last_text(), "");
    }

    #[test]
    fn msg_clamps_to_text_capacity() {
        let mut node = node();
        let text = "z".repeat(100);
        let mut frame = vec![Verb::Msg.code(), 0, 1, 100];
        frame.extend_from_slice(text.as_bytes());
        handle(&mut node, &frame);
        assert_eq!(node.last_text().len(), MAX_TEXT_LEN);
    }

    #[test]
    fn unknown_verb_answers_err_without_touching_state_or_store() {
        let mut node = node();
        let frames = handle(&mut node, &[0x7F, 0, 0x55, 0]);

        assert_eq!(frames.len(), 1);
        let resp = view(&frames[0]);
        assert_eq!(resp.verb(), Some(Verb::RespErr));
        assert_eq!(resp.seq(), 0x55);
        assert_eq!(resp.tlv_len(), 0);

        assert_eq!(node.config(), &NodeConfig::default());
        assert_eq!(node.store().get_string("id", "missing"), "missing");
    }

    #[test]
    fn tlv_region_overrun_answers_err() {
        let mut node = node();
        // SET_PARAM header claiming 20 TLV bytes with none present.
        let frames = handle(&mut node, &[Verb::SetParam.code(), 0, 3, 20]);
        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespErr));
    }

    #[test]
    fn unavailable_store_still_answers_ok() {
        let mut node = node_with_store(MemorySettingsStore::unavailable());
        let mut b = FrameBuilder::new(Verb::SetId, 2);
        b.put_str(Tag::Id, "N31").unwrap();
        let frames = handle(&mut node, &b.finish());

        // Mutation applies in memory; the peer is not told about the
        // missing durability.
        assert_eq!(view(&frames[0]).verb(), Some(Verb::RespOk));
        assert_eq!(node.id(), "N31");
    }

    #[test]
    fn hello_is_resp_ok_seq_zero_with_id_only() {
        let mut node = node();
        let mut sink = CaptureSink::default();
        node.send_hello(&mut sink).unwrap();

        let hello = view(&sink.frames[0]);
        assert_eq!(hello.verb(), Some(Verb::RespOk));
        assert_eq!(hello.seq(), 0);
        assert_eq!(hello.iter().count(), 1);
        assert_eq!(hello.find(Tag::Id), Some(b"HckrMn".as_ref()));
    }
}
