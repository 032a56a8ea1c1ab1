//! # `NDIS_802_11_BSSID_LIST`
//!
//! Layout of the buffer returned for [`OID_802_11_BSSID_LIST`]:
//!
//! ```text
//! offset  size  field
//! 0       4     NumberOfItems
//! 4       ...   NumberOfItems back-to-back NDIS_WLAN_BSSID records
//! ```
//!
//! Each `NDIS_WLAN_BSSID` starts with its own total `Length`, which may be
//! larger than the 104 byte fixed part. Records are walked by that length,
//! never by the fixed size.
//!
//! ```text
//! offset  size  field
//! 0       4     Length
//! 4       6     MacAddress
//! 10      2     Reserved
//! 12      4     Ssid.SsidLength
//! 16      32    Ssid.Ssid (not null terminated)
//! 48      4     Privacy
//! 52      4     Rssi (signed)
//! 56      4     NetworkTypeInUse
//! 60      32    Configuration
//! 92      4     InfrastructureMode
//! 96      8     SupportedRates
//! ```
//!
//! [`OID_802_11_BSSID_LIST`]: crate::ndis::OID_802_11_BSSID_LIST

use apscan_common::network::access_point::{AccessPointRecord, MAX_SSID_LEN};
use apscan_common::network::mac::{self, MAC_LEN};
use thiserror::Error;
use tracing::trace;

pub const LIST_HEADER_LEN: usize = 4;
pub const BSSID_RECORD_LEN: usize = 104;

const MAC_OFFSET: usize = 4;
const SSID_LEN_OFFSET: usize = 12;
const SSID_OFFSET: usize = 16;
const RSSI_OFFSET: usize = 52;
const CONFIGURATION_OFFSET: usize = 60;
const CONFIGURATION_LEN: u32 = 32;
const INFRASTRUCTURE_MODE_OFFSET: usize = 92;
const NDIS_802_11_INFRASTRUCTURE: u32 = 1;

/// Why the decoder stopped before reaching the declared item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("{len} byte response is too short for the list header")]
    TruncatedHeader { len: usize },
    #[error("record {index} at offset {offset}: length field is cut off")]
    TruncatedLength { index: u32, offset: usize },
    #[error("record {index} at offset {offset}: length {declared} is below the fixed record size")]
    TooShort { index: u32, offset: usize, declared: u32 },
    #[error("record {index} at offset {offset}: length {declared} overruns the {extent} byte response")]
    Overrun {
        index: u32,
        offset: usize,
        declared: u32,
        extent: usize,
    },
}

/// The decoded content of one BSSID list response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BssidList {
    /// `NumberOfItems` as written by the driver.
    pub declared: u32,
    /// Records in on-wire order.
    pub records: Vec<AccessPointRecord>,
    /// Set when decoding stopped early; `records` is still valid.
    pub malformed: Option<MalformedRecord>,
}

impl BssidList {
    pub fn is_complete(&self) -> bool {
        self.malformed.is_none()
    }
}

/// Decodes the first `byte_len` bytes of `buffer` as a BSSID list.
///
/// Never fails: a record that would read outside the valid extent stops the
/// walk and everything decoded before it is returned.
pub fn decode_bssid_list(buffer: &[u8], byte_len: usize) -> BssidList {
    let extent: usize = byte_len.min(buffer.len());
    let data: &[u8] = &buffer[..extent];

    let Some(declared) = read_u32(data, 0) else {
        return BssidList {
            malformed: Some(MalformedRecord::TruncatedHeader { len: extent }),
            ..BssidList::default()
        };
    };

    let mut list: BssidList = BssidList {
        declared,
        ..BssidList::default()
    };
    let mut offset: usize = LIST_HEADER_LEN;

    for index in 0..declared {
        let Some(length) = read_u32(data, offset) else {
            list.malformed = Some(MalformedRecord::TruncatedLength { index, offset });
            break;
        };

        if (length as usize) < BSSID_RECORD_LEN {
            list.malformed = Some(MalformedRecord::TooShort {
                index,
                offset,
                declared: length,
            });
            break;
        }

        let record: Option<&[u8]> = offset
            .checked_add(length as usize)
            .and_then(|end| data.get(offset..end));
        let Some(record) = record else {
            list.malformed = Some(MalformedRecord::Overrun {
                index,
                offset,
                declared: length,
                extent,
            });
            break;
        };

        if let Some(ap) = parse_record(record) {
            trace!(index, bssid = %ap.mac_address(), rssi = ap.signal_strength(), "decoded BSSID record");
            list.records.push(ap);
        }

        offset += length as usize;
    }

    list
}

fn parse_record(record: &[u8]) -> Option<AccessPointRecord> {
    let mac_bytes: [u8; MAC_LEN] = record.get(MAC_OFFSET..MAC_OFFSET + MAC_LEN)?.try_into().ok()?;
    let ssid_len: usize = (read_u32(record, SSID_LEN_OFFSET)? as usize).min(MAX_SSID_LEN);
    let ssid: &[u8] = record.get(SSID_OFFSET..SSID_OFFSET + ssid_len)?;
    let rssi: i32 = read_u32(record, RSSI_OFFSET)? as i32;

    Some(AccessPointRecord::new(mac::from_octets(mac_bytes), rssi, ssid))
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let end: usize = offset.checked_add(4)?;
    let raw: [u8; 4] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}

/// Builds BSSID list responses the way a driver lays them out.
///
/// Used by driver doubles and for producing capture files.
#[derive(Debug, Clone, Default)]
pub struct BssidListWriter {
    count: u32,
    declared: Option<u32>,
    body: Vec<u8>,
}

impl BssidListWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record of the standard 104 byte size.
    pub fn push(self, mac: [u8; MAC_LEN], rssi: i32, ssid: &[u8]) -> Self {
        self.push_with_length(mac, rssi, ssid, BSSID_RECORD_LEN as u32)
    }

    /// Appends a record whose `Length` field is `length`.
    ///
    /// Lengths above the fixed size are padded with zeros, like the IEs some
    /// drivers append. Lengths below it still emit the full fixed part.
    pub fn push_with_length(mut self, mac: [u8; MAC_LEN], rssi: i32, ssid: &[u8], length: u32) -> Self {
        let ssid: &[u8] = &ssid[..ssid.len().min(MAX_SSID_LEN)];
        let mut record: Vec<u8> = vec![0u8; BSSID_RECORD_LEN.max(length as usize)];

        record[..4].copy_from_slice(&length.to_le_bytes());
        record[MAC_OFFSET..MAC_OFFSET + MAC_LEN].copy_from_slice(&mac);
        record[SSID_LEN_OFFSET..SSID_OFFSET].copy_from_slice(&(ssid.len() as u32).to_le_bytes());
        record[SSID_OFFSET..SSID_OFFSET + ssid.len()].copy_from_slice(ssid);
        record[RSSI_OFFSET..RSSI_OFFSET + 4].copy_from_slice(&rssi.to_le_bytes());
        record[CONFIGURATION_OFFSET..CONFIGURATION_OFFSET + 4]
            .copy_from_slice(&CONFIGURATION_LEN.to_le_bytes());
        record[INFRASTRUCTURE_MODE_OFFSET..INFRASTRUCTURE_MODE_OFFSET + 4]
            .copy_from_slice(&NDIS_802_11_INFRASTRUCTURE.to_le_bytes());

        self.body.extend_from_slice(&record);
        self.count += 1;
        self
    }

    /// Overrides `NumberOfItems` instead of counting pushed records.
    pub fn declared_count(mut self, declared: u32) -> Self {
        self.declared = Some(declared);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let declared: u32 = self.declared.unwrap_or(self.count);
        let mut out: Vec<u8> = Vec::with_capacity(LIST_HEADER_LEN + self.body.len());
        out.extend_from_slice(&declared.to_le_bytes());
        out.extend_from_slice(&self.body);
        out
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
