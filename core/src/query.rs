//! # Adaptive Query Engine
//!
//! There is no call that reliably reports the size of a BSSID list up front,
//! so the query is a guess-and-grow loop: ask with the current buffer, and on
//! any "too small" status retry with `max(reported, capacity * 2)` bytes until
//! the list fits or the ceiling is hit.

use apscan_common::config::BufferLimits;
use apscan_protocols::ndis::{DriverStatus, StatusCode};
use tracing::{debug, trace};

use crate::error::QueryError;
use crate::session::{DeviceChannel, DriverResponse};

/// Growable receive buffer for one interface's query loop.
///
/// Capacity never exceeds `limits.max()`. Not shared between interfaces.
#[derive(Debug)]
pub struct QueryBuffer {
    bytes: Vec<u8>,
    limits: BufferLimits,
}

impl QueryBuffer {
    pub fn new(limits: BufferLimits) -> Self {
        Self {
            bytes: vec![0; limits.initial()],
            limits,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Replaces the buffer with a zeroed one of `requested` bytes.
    ///
    /// A request past the ceiling allocates nothing: the buffer drops back to
    /// its initial size and the call fails.
    pub fn grow_to(&mut self, requested: usize) -> Result<(), QueryError> {
        if requested > self.limits.max() {
            self.reset();
            return Err(QueryError::BufferOverflow {
                requested,
                max: self.limits.max(),
            });
        }
        // Old contents are never read again, so skip the copy `resize` would do.
        self.bytes = vec![0; requested];
        Ok(())
    }

    pub fn reset(&mut self) {
        if self.bytes.len() != self.limits.initial() {
            self.bytes = vec![0; self.limits.initial()];
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// A completed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The first `len` bytes of the buffer hold a BSSID list.
    Data { len: usize },
    /// The adapter does not answer the BSSID list OID.
    NoData { status: u32 },
}

/// Queries `channel` until the BSSID list fits into `buffer`.
///
/// Every retry at least doubles the capacity, so the loop ends after at most
/// `log2(max / initial) + 1` driver calls.
pub fn query(channel: &mut dyn DeviceChannel, buffer: &mut QueryBuffer) -> Result<QueryOutcome, QueryError> {
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let capacity: usize = buffer.capacity();
        let DriverResponse { status, bytes } = channel.query_bssid_list(buffer.as_mut_slice());
        trace!(attempts, capacity, status = %StatusCode(status), bytes, "driver answered");

        match DriverStatus::classify(status) {
            DriverStatus::Success => {
                // Never trust a byte count larger than what we handed over.
                let len: usize = bytes.min(capacity);
                debug!(attempts, capacity, len, "BSSID list received");
                return Ok(QueryOutcome::Data { len });
            }
            DriverStatus::BufferTooSmall => {
                let next: usize = bytes.max(capacity.saturating_mul(2));
                debug!(
                    status = %StatusCode(status),
                    reported = bytes,
                    capacity,
                    next,
                    "buffer too small, growing"
                );
                buffer.grow_to(next)?;
            }
            DriverStatus::NoData => {
                debug!(status = %StatusCode(status), "adapter does not report a BSSID list");
                return Ok(QueryOutcome::NoData { status });
            }
            DriverStatus::Terminal => return Err(QueryError::DriverTerminal { status }),
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
