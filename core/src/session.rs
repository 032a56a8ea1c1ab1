//! # Device Session
//!
//! A session owns the conversation with one adapter's driver: the DOS device
//! name that makes the driver reachable from user mode, and the handle opened
//! through it. Both are released when the session closes or is dropped, in
//! reverse order of acquisition.
//!
//! The OS calls themselves sit behind [`DeviceNamespace`] and [`DeviceChannel`]
//! so the lifecycle can be driven without a real kernel driver.

use std::io;

use apscan_common::network::interface::InterfaceId;
use tracing::{debug, warn};

use crate::error::{MappingError, QueryError, SessionError};
use crate::query::{self, QueryBuffer, QueryOutcome};

/// Status code and byte count of one `OID_802_11_BSSID_LIST` request.
///
/// On a "buffer too small" status `bytes` is the size the driver claims it
/// needs, which may be zero or wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverResponse {
    pub status: u32,
    pub bytes: usize,
}

/// An open, read-capable handle to an adapter's driver.
///
/// Dropping the channel closes the handle.
pub trait DeviceChannel: Send {
    /// Issues the BSSID list query, letting the driver write up to `out.len()` bytes.
    fn query_bssid_list(&mut self, out: &mut [u8]) -> DriverResponse;
}

/// What a DOS device name currently resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingState {
    Absent,
    Target(String),
}

/// The OS device namespace: DOS device names and handle acquisition.
pub trait DeviceNamespace: Send + Sync {
    fn query_mapping(&self, dos_name: &str) -> io::Result<MappingState>;
    fn define_mapping(&self, dos_name: &str, target: &str) -> io::Result<()>;
    /// Removes the definition of `dos_name` that points at exactly `target`.
    fn remove_mapping(&self, dos_name: &str, target: &str) -> io::Result<()>;
    fn open_channel(&self, path: &str) -> io::Result<Box<dyn DeviceChannel>>;
}

pub struct DeviceSession<'ns> {
    namespace: &'ns dyn DeviceNamespace,
    id: InterfaceId,
    channel: Option<Box<dyn DeviceChannel>>,
    created_mapping: bool,
}

impl<'ns> DeviceSession<'ns> {
    /// Maps the interface's DOS device name and opens a channel through it.
    ///
    /// A mapping created here is removed again if the channel cannot be opened.
    pub fn open(namespace: &'ns dyn DeviceNamespace, id: &InterfaceId) -> Result<Self, SessionError> {
        let created_mapping: bool =
            ensure_mapping(namespace, id).map_err(|source| SessionError::MappingFailed {
                name: id.to_string(),
                source,
            })?;

        let mut session: DeviceSession<'ns> = Self {
            namespace,
            id: id.clone(),
            channel: None,
            created_mapping,
        };

        let path: String = id.open_path();
        match namespace.open_channel(&path) {
            Ok(channel) => {
                debug!(interface = %id, created_mapping, "device session opened");
                session.channel = Some(channel);
                Ok(session)
            }
            // `session` drops here and releases the mapping.
            Err(source) => Err(SessionError::HandleUnavailable { path, source }),
        }
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Runs the adaptive BSSID list query over this session's channel.
    pub fn query(&mut self, buffer: &mut QueryBuffer) -> Result<QueryOutcome, QueryError> {
        let channel: &mut dyn DeviceChannel = self
            .channel
            .as_deref_mut()
            .ok_or(QueryError::ChannelClosed)?;
        query::query(channel, buffer)
    }

    /// Closes the channel, then removes the mapping if this session created it.
    ///
    /// Safe to call any number of times.
    pub fn close(&mut self) {
        if let Some(channel) = self.channel.take() {
            drop(channel);
            debug!(interface = %self.id, "device channel closed");
        }

        if self.created_mapping {
            self.created_mapping = false;
            let target: String = self.id.device_path();
            if let Err(e) = self.namespace.remove_mapping(self.id.dos_name(), &target) {
                warn!(interface = %self.id, "could not remove DOS device mapping: {e}");
            }
        }
    }
}

impl Drop for DeviceSession<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Makes `<name>` resolve to `\Device\<name>`. Returns whether it had to be created.
fn ensure_mapping(namespace: &dyn DeviceNamespace, id: &InterfaceId) -> Result<bool, MappingError> {
    let dos_name: &str = id.dos_name();
    let target: String = id.device_path();

    match namespace.query_mapping(dos_name).map_err(MappingError::Lookup)? {
        MappingState::Target(current) if current == target => return Ok(false),
        MappingState::Target(current) => return Err(MappingError::Conflict(current)),
        MappingState::Absent => {}
    }

    namespace
        .define_mapping(dos_name, &target)
        .map_err(MappingError::Define)?;

    // Someone else may have raced us, or the definition silently did nothing.
    match namespace.query_mapping(dos_name) {
        Ok(MappingState::Target(current)) if current == target => Ok(true),
        _ => {
            if let Err(e) = namespace.remove_mapping(dos_name, &target) {
                debug!(interface = %id, "cleanup of unverified mapping failed: {e}");
            }
            Err(MappingError::NotVisible)
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
