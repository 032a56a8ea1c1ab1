//! # System Backend
//!
//! The real adapter registry and device namespace of the host OS. Only Windows
//! exposes NDIS drivers to user mode this way; elsewhere the backend is
//! unavailable and callers have to bring their own.

use std::sync::Arc;

use crate::directory::AdapterRegistry;
use crate::error::PlatformError;
use crate::session::DeviceNamespace;

#[cfg(windows)]
mod win32;

pub struct SystemBackend {
    pub registry: Box<dyn AdapterRegistry>,
    pub namespace: Arc<dyn DeviceNamespace>,
}

#[cfg(windows)]
pub fn system_backend() -> Result<SystemBackend, PlatformError> {
    Ok(SystemBackend {
        registry: Box::new(win32::NetworkCardsRegistry),
        namespace: Arc::new(win32::NdisNamespace),
    })
}

#[cfg(not(windows))]
pub fn system_backend() -> Result<SystemBackend, PlatformError> {
    Err(PlatformError::Unsupported)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
