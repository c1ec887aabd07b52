use crate::store::SettingsStore;

/// Maximum node ID length in bytes.
pub const MAX_ID_LEN: usize = 31;
/// Maximum alias length in bytes.
pub const MAX_ALIAS_LEN: usize = 31;
/// Maximum retained text-message length in bytes.
pub const MAX_TEXT_LEN: usize = 63;

/// Device configuration state.
///
/// One instance per node, owned by the interpreter and mutated only
/// through the validated SET_ID / SET_PARAM / MSG paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Node ID: 1..=31 bytes of `[A-Za-z0-9_-]`.
    pub id: String,
    /// Friendly name: 0..=31 bytes, free-form.
    pub alias: String,
    /// RF frequency in Hz.
    pub freq_hz: u32,
    /// Spreading factor, 7..=12.
    pub sf: u8,
    /// Bandwidth in Hz.
    pub bw_hz: u32,
    /// Coding rate code, 5..=8 (4/5..4/8).
    pub cr: u8,
    /// TX power in dBm.
    pub tx_pwr_dbm: i8,
    /// Abstract channel index.
    pub chan: u8,
    /// Operating mode (0=relay, 1=direct, 2=gateway).
    pub mode: u8,
    /// Maximum hop count.
    pub hops: u8,
    /// Beacon interval in seconds; 0 disables.
    pub beacon_s: u32,
    /// Outbound queue size.
    pub buf_size: u16,
    /// Acknowledgement mode, 0 or 1.
    pub ack_mode: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            id: "HckrMn".to_string(),
            alias: String::new(),
            freq_hz: 915_000_000,
            sf: 9,
            bw_hz: 125_000,
            cr: 5,
            tx_pwr_dbm: 17,
            chan: 0,
            mode: 0,
            hops: 1,
            beacon_s: 0,
            buf_size: 32,
            ack_mode: 0,
        }
    }
}

impl NodeConfig {
    /// Load persisted values over defaults.
    pub fn load_from(store: &dyn SettingsStore) -> Self {
        let d = Self::default();
        Self {
            id: store.get_string("id", &d.id),
            alias: store.get_string("alias", &d.alias),
            freq_hz: store.get_uint("freq_hz", d.freq_hz),
            sf: store.get_uint("sf", d.sf as u32) as u8,
            bw_hz: store.get_uint("bw_hz", d.bw_hz),
            cr: store.get_uint("cr", d.cr as u32) as u8,
            tx_pwr_dbm: store.get_int("tx_pwr", d.tx_pwr_dbm as i32) as i8,
            chan: store.get_uint("chan", d.chan as u32) as u8,
            mode: store.get_uint("mode", d.mode as u32) as u8,
            hops: store.get_uint("hops", d.hops as u32) as u8,
            beacon_s: store.get_uint("beacon_s", d.beacon_s),
            buf_size: store.get_uint("buf_size", d.buf_size as u32) as u16,
            ack_mode: store.get_uint("ack_mode", d.ack_mode as u32) as u8,
        }
    }

    /// Write every field through the store.
    pub fn persist_to(&self, store: &mut dyn SettingsStore) {
        store.put_string("id", &self.id);
        store.put_string("alias", &self.alias);
        store.put_uint("freq_hz", self.freq_hz);
        store.put_uint("sf", self.sf as u32);
        store.put_uint("bw_hz", self.bw_hz);
        store.put_uint("cr", self.cr as u32);
        store.put_int("tx_pwr", self.tx_pwr_dbm as i32);
        store.put_uint("chan", self.chan as u32);
        store.put_uint("mode", self.mode as u32);
        store.put_uint("hops", self.hops as u32);
        store.put_uint("beacon_s", self.beacon_s);
        store.put_uint("buf_size", self.buf_size as u32);
        store.put_uint("ack_mode", self.ack_mode as u32);
    }
}

/// Node ID charset and length check: 1..=31 ASCII letters, digits,
/// `-` or `_`.
pub fn is_valid_id(id: &str) -> bool {
    let n = id.len();
    if n == 0 || n > MAX_ID_LEN {
        return false;
    }
    id.bytes()
        .all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_')
}

/// Spreading factor range check.
pub fn is_valid_sf(v: u8) -> bool {
    (7..=12).contains(&v)
}

/// Coding rate code range check.
pub fn is_valid_cr(v: u8) -> bool {
    (5..=8).contains(&v)
}

/// Acknowledgement mode check.
pub fn is_valid_ack(v: u8) -> bool {
    v == 0 || v == 1
}
