/// Wire width and kind of a tag's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagWidth {
    /// Raw string bytes, never NUL-terminated on the wire.
    Str { max: usize },
    U8,
    I8,
    U16,
    I16,
    U32,
}

/// Field identifier for TLV records.
///
/// Tags are partitioned into four fixed numeric ranges: identity/system
/// (0x01..), radio (0x10..), behavior/routing (0x20..), diagnostics
/// (0x30.., read-only). Codes are a shared contract with the remote
/// peer and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    // Identity / System
    Id = 0x01,
    Alias = 0x02,
    FwVersion = 0x03,
    UptimeS = 0x04,
    BootTime = 0x05,

    // Radio
    FreqHz = 0x10,
    Sf = 0x11,
    BwHz = 0x12,
    Cr = 0x13,
    TxPwrDbm = 0x14,
    Chan = 0x15,

    // Behavior / Routing
    Mode = 0x20,
    Hops = 0x21,
    BeaconSec = 0x22,
    BufSize = 0x23,
    AckMode = 0x24,

    // Diagnostics (read-only)
    RssiDbm = 0x30,
    SnrDb = 0x31,
    VbatMv = 0x32,
    TempC10 = 0x33,
    FreeMem = 0x34,
    FreeFlash = 0x35,
    LogCount = 0x36,
}

impl Tag {
    /// Decode a wire byte. Unknown tags are silently ignored upstream
    /// (forward compatibility).
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Id),
            0x02 => Some(Self::Alias),
            0x03 => Some(Self::FwVersion),
            0x04 => Some(Self::UptimeS),
            0x05 => Some(Self::BootTime),
            0x10 => Some(Self::FreqHz),
            0x11 => Some(Self::Sf),
            0x12 => Some(Self::BwHz),
            0x13 => Some(Self::Cr),
            0x14 => Some(Self::TxPwrDbm),
            0x15 => Some(Self::Chan),
            0x20 => Some(Self::Mode),
            0x21 => Some(Self::Hops),
            0x22 => Some(Self::BeaconSec),
            0x23 => Some(Self::BufSize),
            0x24 => Some(Self::AckMode),
            0x30 => Some(Self::RssiDbm),
            0x31 => Some(Self::SnrDb),
            0x32 => Some(Self::VbatMv),
            0x33 => Some(Self::TempC10),
            0x34 => Some(Self::FreeMem),
            0x35 => Some(Self::FreeFlash),
            0x36 => Some(Self::LogCount),
            _ => None,
        }
    }

    /// Wire code for this tag.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Value width and kind on the wire.
    pub fn width(self) -> TagWidth {
        match self {
            Self::Id | Self::Alias => TagWidth::Str { max: 31 },
            Self::FwVersion => TagWidth::Str { max: 255 },
            Self::UptimeS | Self::BootTime | Self::FreqHz | Self::BwHz | Self::BeaconSec => {
                TagWidth::U32
            }
            Self::FreeMem | Self::FreeFlash => TagWidth::U32,
            Self::Sf | Self::Cr | Self::Chan | Self::Mode | Self::Hops | Self::AckMode => {
                TagWidth::U8
            }
            Self::TxPwrDbm | Self::SnrDb => TagWidth::I8,
            Self::VbatMv | Self::LogCount => TagWidth::U16,
            Self::RssiDbm | Self::TempC10 => TagWidth::I16,
        }
    }

    /// True for diagnostics tags, which are never settable.
    pub fn is_diagnostic(self) -> bool {
        matches!(
            self,
            Self::RssiDbm
                | Self::SnrDb
                | Self::VbatMv
                | Self::TempC10
                | Self::FreeMem
                | Self::FreeFlash
                | Self::LogCount
        )
    }

    /// True for tags mutable via SET_PARAM.
    ///
    /// The node ID has its own verb (SET_ID) with stricter validation;
    /// firmware version, uptime, and boot time are runtime-sourced.
    pub fn is_settable(self) -> bool {
        matches!(
            self,
            Self::Alias
                | Self::FreqHz
                | Self::Sf
                | Self::BwHz
                | Self::Cr
                | Self::TxPwrDbm
                | Self::Chan
                | Self::Mode
                | Self::Hops
                | Self::BeaconSec
                | Self::BufSize
                | Self::AckMode
        )
    }

    /// Short lowercase name, also accepted by [`Tag::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Alias => "alias",
            Self::FwVersion => "fw_version",
            Self::UptimeS => "uptime_s",
            Self::BootTime => "boot_time",
            Self::FreqHz => "freq_hz",
            Self::Sf => "sf",
            Self::BwHz => "bw_hz",
            Self::Cr => "cr",
            Self::TxPwrDbm => "tx_pwr_dbm",
            Self::Chan => "chan",
            Self::Mode => "mode",
            Self::Hops => "hops",
            Self::BeaconSec => "beacon_sec",
            Self::BufSize => "buf_size",
            Self::AckMode => "ack_mode",
            Self::RssiDbm => "rssi_dbm",
            Self::SnrDb => "snr_db",
            Self::VbatMv => "vbat_mv",
            Self::TempC10 => "temp_c10",
            Self::FreeMem => "free_mem",
            Self::FreeFlash => "free_flash",
            Self::LogCount => "log_count",
        }
    }

    /// Resolve a tag from its short name (CLI and config surfaces).
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_TAGS.iter().copied().find(|t| t.name() == name)
    }
}

/// Every known tag, in ascending code order.
pub const ALL_TAGS: [Tag; 23] = [
    Tag::Id,
    Tag::Alias,
    Tag::FwVersion,
    Tag::UptimeS,
    Tag::BootTime,
    Tag::FreqHz,
    Tag::Sf,
    Tag::BwHz,
    Tag::Cr,
    Tag::TxPwrDbm,
    Tag::Chan,
    Tag::Mode,
    Tag::Hops,
    Tag::BeaconSec,
    Tag::BufSize,
    Tag::AckMode,
    Tag::RssiDbm,
    Tag::SnrDb,
    Tag::VbatMv,
    Tag::TempC10,
    Tag::FreeMem,
    Tag::FreeFlash,
    Tag::LogCount,
];
