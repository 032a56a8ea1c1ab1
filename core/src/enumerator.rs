//! # Enumeration Coordinator
//!
//! Drives one pass over every interface: directory, session, query, decode.
//! A misbehaving adapter only ever costs its own records; the pass as a whole
//! fails only when every interface that was tried came back empty-handed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use apscan_common::config::BufferLimits;
use apscan_common::network::access_point::AccessPointRecord;
use apscan_common::network::interface::InterfaceId;
use apscan_protocols::bssid::{self, BssidList, MalformedRecord};
use apscan_protocols::ndis::StatusCode;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::directory::{self, AdapterRegistry};
use crate::error::{QueryError, SessionError};
use crate::query::{QueryBuffer, QueryOutcome};
use crate::session::{DeviceNamespace, DeviceSession};

/// What happened to one interface during a pass.
#[derive(Debug)]
pub enum InterfaceOutcome {
    /// The driver returned a BSSID list. `records` may be fewer than the list
    /// declared when decoding stopped early.
    Scanned {
        records: usize,
        malformed: Option<MalformedRecord>,
    },
    /// The adapter does not report BSSID lists, e.g. a wired card.
    NoData { status: u32 },
    /// No session could be opened; the interface was never queried.
    Skipped(SessionError),
    Failed(QueryError),
    /// A stop was requested before this interface was reached.
    NotStarted,
}

impl InterfaceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Scanned { .. } | Self::NoData { .. })
    }
}

#[derive(Debug)]
pub struct InterfaceReport {
    pub id: InterfaceId,
    pub outcome: InterfaceOutcome,
}

/// Records from every interface, in interface order then on-wire order.
#[derive(Debug, Default)]
pub struct EnumerationResult {
    pub records: Vec<AccessPointRecord>,
    pub success: bool,
    pub report: Vec<InterfaceReport>,
}

impl EnumerationResult {
    pub fn succeeded(&self) -> usize {
        self.count(InterfaceOutcome::is_success)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, InterfaceOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, InterfaceOutcome::Skipped(_)))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, InterfaceOutcome::NotStarted))
    }

    /// Interfaces a session was at least tried for.
    pub fn attempted(&self) -> usize {
        self.report.len() - self.cancelled()
    }

    fn count(&self, pred: impl Fn(&InterfaceOutcome) -> bool) -> usize {
        self.report.iter().filter(|r| pred(&r.outcome)).count()
    }
}

type ProgressCallback = Arc<dyn Fn(&InterfaceReport) + Send + Sync>;

pub struct Enumerator {
    registry: Box<dyn AdapterRegistry>,
    namespace: Arc<dyn DeviceNamespace>,
    limits: BufferLimits,
    parallel: bool,
    stop: Arc<AtomicBool>,
    on_interface_done: Option<ProgressCallback>,
}

impl Enumerator {
    pub fn new(registry: Box<dyn AdapterRegistry>, namespace: Arc<dyn DeviceNamespace>) -> Self {
        Self {
            registry,
            namespace,
            limits: BufferLimits::default(),
            parallel: false,
            stop: Arc::new(AtomicBool::new(false)),
            on_interface_done: None,
        }
    }

    pub fn with_limits(mut self, limits: BufferLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Queries interfaces on the rayon pool instead of one after another.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shares `stop` as the "do not start another interface" flag.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Calls `callback` as soon as each interface is finished.
    pub fn on_interface_done(mut self, callback: impl Fn(&InterfaceReport) + Send + Sync + 'static) -> Self {
        self.on_interface_done = Some(Arc::new(callback));
        self
    }

    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn interfaces(&self) -> Vec<InterfaceId> {
        directory::list_interfaces(self.registry.as_ref())
    }

    /// Runs one full pass over every interface.
    pub fn enumerate(&self) -> EnumerationResult {
        let ids: Vec<InterfaceId> = self.interfaces();
        debug!(interfaces = ids.len(), parallel = self.parallel, "starting enumeration pass");

        let scanned: Vec<(InterfaceReport, Vec<AccessPointRecord>)> = if self.parallel {
            ids.into_par_iter().map(|id| self.scan_interface(id)).collect()
        } else {
            ids.into_iter().map(|id| self.scan_interface(id)).collect()
        };

        let mut result: EnumerationResult = EnumerationResult::default();
        for (report, records) in scanned {
            result.records.extend(records);
            result.report.push(report);
        }
        result.success = verdict(&result);

        info!(
            records = result.records.len(),
            succeeded = result.succeeded(),
            failed = result.failed(),
            skipped = result.skipped(),
            success = result.success,
            "enumeration pass finished"
        );
        result
    }

    fn scan_interface(&self, id: InterfaceId) -> (InterfaceReport, Vec<AccessPointRecord>) {
        let (outcome, records) = if self.stop.load(Ordering::Relaxed) {
            debug!(interface = %id, "stop requested, not starting");
            (InterfaceOutcome::NotStarted, Vec::new())
        } else {
            self.query_interface(&id)
        };

        let report: InterfaceReport = InterfaceReport { id, outcome };
        if let Some(callback) = &self.on_interface_done {
            callback(&report);
        }
        (report, records)
    }

    fn query_interface(&self, id: &InterfaceId) -> (InterfaceOutcome, Vec<AccessPointRecord>) {
        let mut session: DeviceSession<'_> = match DeviceSession::open(self.namespace.as_ref(), id) {
            Ok(session) => session,
            Err(e) => {
                warn!(interface = %id, "skipping interface: {e}");
                return (InterfaceOutcome::Skipped(e), Vec::new());
            }
        };

        let mut buffer: QueryBuffer = QueryBuffer::new(self.limits);
        let queried: Result<QueryOutcome, QueryError> = session.query(&mut buffer);
        session.close();

        match queried {
            Ok(QueryOutcome::Data { len }) => {
                let list: BssidList = bssid::decode_bssid_list(buffer.as_slice(), len);
                if let Some(malformed) = &list.malformed {
                    warn!(
                        interface = %id,
                        decoded = list.records.len(),
                        declared = list.declared,
                        "BSSID list cut short: {malformed}"
                    );
                }
                debug!(interface = %id, records = list.records.len(), "interface scanned");
                let outcome: InterfaceOutcome = InterfaceOutcome::Scanned {
                    records: list.records.len(),
                    malformed: list.malformed,
                };
                (outcome, list.records)
            }
            Ok(QueryOutcome::NoData { status }) => {
                debug!(interface = %id, status = %StatusCode(status), "interface has no BSSID list");
                (InterfaceOutcome::NoData { status }, Vec::new())
            }
            Err(e) => {
                error!(interface = %id, "query failed: {e}");
                (InterfaceOutcome::Failed(e), Vec::new())
            }
        }
    }
}

/// Success if any interface succeeded, or if none was attempted at all.
fn verdict(result: &EnumerationResult) -> bool {
    result.succeeded() > 0 || (result.failed() == 0 && result.skipped() == 0)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
