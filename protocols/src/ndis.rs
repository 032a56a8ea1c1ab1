use std::fmt;

/// `CTL_CODE(FILE_DEVICE_PHYSICAL_NETCARD, 0, METHOD_OUT_DIRECT, FILE_ANY_ACCESS)`.
pub const IOCTL_NDIS_QUERY_GLOBAL_STATS: u32 = 0x0017_0002;
/// Requests the list of BSSIDs the adapter saw in its last scan.
pub const OID_802_11_BSSID_LIST: u32 = 0x0D01_0217;

pub const ERROR_SUCCESS: u32 = 0;
pub const ERROR_INVALID_FUNCTION: u32 = 1;
pub const ERROR_ACCESS_DENIED: u32 = 5;
pub const ERROR_INVALID_HANDLE: u32 = 6;
pub const ERROR_GEN_FAILURE: u32 = 31;
pub const ERROR_NOT_SUPPORTED: u32 = 50;
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;
pub const ERROR_MORE_DATA: u32 = 234;
pub const ERROR_DEVICE_NOT_CONNECTED: u32 = 1167;

pub const NDIS_STATUS_NOT_SUPPORTED: u32 = 0xC000_00BB;
pub const NDIS_STATUS_INVALID_LENGTH: u32 = 0xC001_0014;
pub const NDIS_STATUS_BUFFER_TOO_SHORT: u32 = 0xC001_0016;
pub const NDIS_STATUS_INVALID_OID: u32 = 0xC001_0017;

/// How a status code returned by the BSSID list query must be handled.
///
/// Drivers disagree on how to say "your buffer is too small", so several
/// unrelated codes collapse into [`DriverStatus::BufferTooSmall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    /// The buffer holds a complete BSSID list.
    Success,
    /// Retry with a larger buffer.
    BufferTooSmall,
    /// The adapter cannot answer this OID (e.g. a wired card). Zero records.
    NoData,
    /// The conversation with this adapter failed.
    Terminal,
}

impl DriverStatus {
    pub fn classify(code: u32) -> Self {
        match code {
            ERROR_SUCCESS => Self::Success,
            // ERROR_GEN_FAILURE is what some Intel cards return for a short buffer.
            ERROR_GEN_FAILURE
            | ERROR_INSUFFICIENT_BUFFER
            | ERROR_MORE_DATA
            | NDIS_STATUS_INVALID_LENGTH
            | NDIS_STATUS_BUFFER_TOO_SHORT => Self::BufferTooSmall,
            ERROR_INVALID_FUNCTION
            | ERROR_NOT_SUPPORTED
            | NDIS_STATUS_NOT_SUPPORTED
            | NDIS_STATUS_INVALID_OID => Self::NoData,
            _ => Self::Terminal,
        }
    }
}

/// Recovers the status a failed ioctl reported from the HRESULT it was wrapped in.
///
/// Win32 codes come back as `0x8007xxxx` and are unwrapped. NDIS status codes
/// already have the high bit set and pass through unchanged.
pub fn status_from_hresult(hresult: u32) -> u32 {
    const FACILITY_WIN32_MASK: u32 = 0xFFFF_0000;
    const FACILITY_WIN32_PREFIX: u32 = 0x8007_0000;

    if hresult & FACILITY_WIN32_MASK == FACILITY_WIN32_PREFIX {
        hresult & !FACILITY_WIN32_MASK
    } else {
        hresult
    }
}

/// Human readable name of a status code, used in logs.
pub fn status_name(code: u32) -> Option<&'static str> {
    let name: &str = match code {
        ERROR_SUCCESS => "ERROR_SUCCESS",
        ERROR_INVALID_FUNCTION => "ERROR_INVALID_FUNCTION",
        ERROR_ACCESS_DENIED => "ERROR_ACCESS_DENIED",
        ERROR_INVALID_HANDLE => "ERROR_INVALID_HANDLE",
        ERROR_GEN_FAILURE => "ERROR_GEN_FAILURE",
        ERROR_NOT_SUPPORTED => "ERROR_NOT_SUPPORTED",
        ERROR_INSUFFICIENT_BUFFER => "ERROR_INSUFFICIENT_BUFFER",
        ERROR_MORE_DATA => "ERROR_MORE_DATA",
        ERROR_DEVICE_NOT_CONNECTED => "ERROR_DEVICE_NOT_CONNECTED",
        NDIS_STATUS_NOT_SUPPORTED => "NDIS_STATUS_NOT_SUPPORTED",
        NDIS_STATUS_INVALID_LENGTH => "NDIS_STATUS_INVALID_LENGTH",
        NDIS_STATUS_BUFFER_TOO_SHORT => "NDIS_STATUS_BUFFER_TOO_SHORT",
        NDIS_STATUS_INVALID_OID => "NDIS_STATUS_INVALID_OID",
        _ => return None,
    };
    Some(name)
}

/// Display wrapper printing a status code as `0xC0010014 (NDIS_STATUS_INVALID_LENGTH)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u32);

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match status_name(self.0) {
            Some(name) => write!(f, "{:#010x} ({name})", self.0),
            None => write!(f, "{:#010x}", self.0),
        }
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
