use std::io;

use apscan_protocols::ndis::StatusCode;
use thiserror::Error;

/// Why a DOS device name could not be pointed at an adapter.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("lookup failed: {0}")]
    Lookup(#[source] io::Error),
    #[error("name already points at {0}")]
    Conflict(String),
    #[error("definition failed: {0}")]
    Define(#[source] io::Error),
    #[error("definition not visible after creating it")]
    NotVisible,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not map {name}: {source}")]
    MappingFailed {
        name: String,
        #[source]
        source: MappingError,
    },
    #[error("could not open {path}: {source}")]
    HandleUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("growing the buffer to {requested} bytes would exceed the {max} byte ceiling")]
    BufferOverflow { requested: usize, max: usize },
    #[error("driver returned {}", StatusCode(*status))]
    DriverTerminal { status: u32 },
    #[error("the session channel is already closed")]
    ChannelClosed,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("adapter registry is unavailable: {0}")]
    Unavailable(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("NDIS device queries are only available on Windows")]
    Unsupported,
}
