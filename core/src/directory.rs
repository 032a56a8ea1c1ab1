//! # Interface Directory
//!
//! Turns the system's adapter registry into the ordered set of interface
//! identifiers worth querying. An unreadable registry or an empty one means
//! "no work to do", never a failure of the pass.

use std::collections::HashSet;
use std::io;

use apscan_common::network::interface::InterfaceId;
use tracing::{debug, info, warn};

use crate::error::DirectoryError;

/// One installed network adapter as listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterEntry {
    /// Registry key the entry was read from, used for diagnostics only.
    pub key: String,
    /// The adapter's low-level service name, if the entry declares one.
    pub service_name: Option<String>,
}

impl AdapterEntry {
    pub fn new(key: impl Into<String>, service_name: Option<&str>) -> Self {
        Self {
            key: key.into(),
            service_name: service_name.map(str::to_string),
        }
    }
}

/// Source of installed adapters, in enumeration order.
pub trait AdapterRegistry: Send + Sync {
    fn adapters(&self) -> Result<Vec<AdapterEntry>, DirectoryError>;
}

/// A fixed list of service names, e.g. given on the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    names: Vec<String>,
}

impl StaticRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl AdapterRegistry for StaticRegistry {
    fn adapters(&self) -> Result<Vec<AdapterEntry>, DirectoryError> {
        Ok(self
            .names
            .iter()
            .enumerate()
            .map(|(idx, name)| AdapterEntry::new(format!("static/{idx}"), Some(name)))
            .collect())
    }
}

/// Walks numbered adapter keys until `key_at` runs out.
///
/// `key_at(i)` names the i-th key and `service_name` reads a key's service
/// name. A key listing error after the first key ends the walk but keeps the
/// entries already read; failing on the very first key means the registry is
/// unavailable.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn collect_adapters<K, S>(mut key_at: K, service_name: S) -> Result<Vec<AdapterEntry>, DirectoryError>
where
    K: FnMut(u32) -> io::Result<Option<String>>,
    S: Fn(&str) -> io::Result<Option<String>>,
{
    let mut entries: Vec<AdapterEntry> = Vec::new();
    let mut index: u32 = 0;

    loop {
        let key: String = match key_at(index) {
            Ok(Some(key)) => key,
            Ok(None) => break,
            Err(e) if entries.is_empty() => return Err(DirectoryError::Unavailable(e)),
            Err(e) => {
                warn!(read = entries.len(), "adapter listing stopped early: {e}");
                break;
            }
        };
        index += 1;

        let service_name: Option<String> = match service_name(&key) {
            Ok(name) => name,
            Err(e) => {
                debug!(key = %key, "could not read service name: {e}");
                None
            }
        };
        entries.push(AdapterEntry { key, service_name });
    }
    Ok(entries)
}

/// Returns the service names of every adapter, in registry order.
///
/// Entries without a usable service name are logged and left out, as are
/// repeated names: two sessions on one DOS device name would collide.
pub fn list_interfaces(registry: &dyn AdapterRegistry) -> Vec<InterfaceId> {
    let entries: Vec<AdapterEntry> = match registry.adapters() {
        Ok(entries) => entries,
        Err(e) => {
            warn!("{e}");
            return Vec::new();
        }
    };

    let mut seen: HashSet<InterfaceId> = HashSet::new();
    let mut ids: Vec<InterfaceId> = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(id) = entry.service_name.as_deref().and_then(InterfaceId::new) else {
            warn!(key = %entry.key, "adapter entry has no service name, skipping");
            continue;
        };
        if !seen.insert(id.clone()) {
            debug!(interface = %id, "duplicate adapter entry ignored");
            continue;
        }
        ids.push(id);
    }

    if ids.is_empty() {
        info!("no network adapters found");
    }
    ids
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
