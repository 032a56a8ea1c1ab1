use std::fmt::Write;

use pnet::util::MacAddr;

/// Number of octets in an IEEE 802 physical address.
pub const MAC_LEN: usize = 6;

/// Builds a [`MacAddr`] from raw octets in wire order.
pub fn from_octets(octets: [u8; MAC_LEN]) -> MacAddr {
    let [a, b, c, d, e, f] = octets;
    MacAddr::new(a, b, c, d, e, f)
}

/// Returns the raw octets of `mac` in wire order.
pub fn octets(mac: MacAddr) -> [u8; MAC_LEN] {
    let MacAddr(a, b, c, d, e, f) = mac;
    [a, b, c, d, e, f]
}

/// Renders `mac` as 12 lowercase hex digits with no separators.
///
/// This is the form the location service expects (`aabbcc001122`), unlike
/// the colon separated `Display` impl of [`MacAddr`].
pub fn to_compact_hex(mac: MacAddr) -> String {
    let mut out: String = String::with_capacity(MAC_LEN * 2);
    for octet in octets(mac) {
        // Writing into a String cannot fail.
        let _ = write!(out, "{octet:02x}");
    }
    out
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
