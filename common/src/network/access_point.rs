//! # Access Point Record
//!
//! The unit of output of a scan: one access point as reported by one
//! interface's driver, reduced to the three values the location service needs.

use std::borrow::Cow;

use pnet::util::MacAddr;

use crate::network::mac;

/// Largest SSID an 802.11 frame can carry.
pub const MAX_SSID_LEN: usize = 32;

/// A single access point observed during an enumeration pass.
///
/// The SSID is kept as raw bytes: drivers hand back whatever was in the
/// beacon, which is neither guaranteed to be UTF-8 nor null terminated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessPointRecord {
    mac: MacAddr,
    signal_strength: i32,
    ssid: Vec<u8>,
}

impl AccessPointRecord {
    pub fn new(mac: MacAddr, signal_strength: i32, ssid: impl Into<Vec<u8>>) -> Self {
        Self {
            mac,
            signal_strength,
            ssid: ssid.into(),
        }
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    /// The BSSID as 12 lowercase hex digits, e.g. `aabbcc001122`.
    pub fn mac_address(&self) -> String {
        mac::to_compact_hex(self.mac)
    }

    /// Received signal strength as reported by the driver (usually dBm).
    pub fn signal_strength(&self) -> i32 {
        self.signal_strength
    }

    pub fn ssid(&self) -> &[u8] {
        &self.ssid
    }

    /// SSID for display; invalid UTF-8 sequences are replaced.
    pub fn ssid_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.ssid)
    }

    /// Hidden networks beacon an empty or all-zero SSID.
    pub fn is_hidden(&self) -> bool {
        self.ssid.iter().all(|&b| b == 0)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
