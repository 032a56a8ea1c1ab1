use std::fmt;

/// Identifies one adapter's low-level NDIS device by its service name.
///
/// The same name is used three ways: as a DOS device name, as the raw kernel
/// object path it is mapped to, and as the Win32 path the channel is opened at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(String);

impl InterfaceId {
    /// Returns `None` for names that are empty once trimmed.
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name: &str = name.as_ref().trim();
        if name.is_empty() {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The DOS device name, e.g. `{4D36E972-...}`.
    pub fn dos_name(&self) -> &str {
        &self.0
    }

    /// The kernel object the DOS name must point at, e.g. `\Device\{4D36E972-...}`.
    pub fn device_path(&self) -> String {
        format!("\\Device\\{}", self.0)
    }

    /// The Win32 path used to open a handle, e.g. `\\.\{4D36E972-...}`.
    pub fn open_path(&self) -> String {
        format!("\\\\.\\{}", self.0)
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InterfaceId {
    fn as_ref(&self) -> &str {
        &self.0
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
