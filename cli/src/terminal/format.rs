use apscan_common::network::access_point::AccessPointRecord;
use colored::*;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn signal_color(rssi: i32) -> Color {
    match rssi {
        -60.. => colors::SIGNAL_STRONG,
        -75..=-61 => colors::SIGNAL_FAIR,
        _ => colors::SIGNAL_WEAK,
    }
}

/// Name shown for an access point: its SSID, or a placeholder for hidden ones.
pub fn display_name(record: &AccessPointRecord) -> String {
    if record.is_hidden() {
        "<hidden network>".to_string()
    } else {
        record.ssid_lossy().into_owned()
    }
}

pub fn bssid_to_detail(record: &AccessPointRecord) -> Detail {
    ("BSSID".to_string(), record.mac().to_string().color(colors::MAC_ADDR))
}

pub fn signal_to_detail(record: &AccessPointRecord) -> Detail {
    let rssi: i32 = record.signal_strength();
    ("Signal".to_string(), format!("{rssi} dBm").color(signal_color(rssi)))
}

pub fn ssid_to_detail(record: &AccessPointRecord) -> Detail {
    let value: ColoredString = if record.is_hidden() {
        "hidden".italic().bright_black()
    } else {
        record.ssid_lossy().color(colors::SSID)
    };
    ("SSID".to_string(), value)
}

pub fn vendor_to_detail(vendor: &Option<String>) -> Option<Detail> {
    vendor
        .as_ref()
        .map(|v| ("Vendor".to_string(), v.color(colors::VENDOR)))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
