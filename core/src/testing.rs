//! In-memory driver and device namespace for unit tests.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use apscan_protocols::bssid::BssidListWriter;
use apscan_protocols::ndis;

use crate::session::{DeviceChannel, DeviceNamespace, DriverResponse, MappingState};

#[derive(Debug, Clone)]
enum Fallback {
    Status(u32),
    /// Answers like a real driver: the list if it fits, otherwise "more data".
    List(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct FakeDriver {
    script: VecDeque<DriverResponse>,
    fallback: Fallback,
    capacities: Arc<Mutex<Vec<usize>>>,
    trip: Option<Arc<AtomicBool>>,
}

impl FakeDriver {
    pub fn scripted(script: Vec<DriverResponse>) -> Self {
        Self {
            script: script.into(),
            fallback: Fallback::Status(ndis::ERROR_DEVICE_NOT_CONNECTED),
            capacities: Arc::default(),
            trip: None,
        }
    }

    pub fn always(status: u32) -> Self {
        Self::scripted(Vec::new()).then_status(status)
    }

    pub fn list(list: Vec<u8>) -> Self {
        Self::scripted(Vec::new()).then_list(list)
    }

    pub fn empty_list() -> Self {
        Self::list(BssidListWriter::new().finish())
    }

    pub fn then_status(mut self, status: u32) -> Self {
        self.fallback = Fallback::Status(status);
        self
    }

    pub fn then_list(mut self, list: Vec<u8>) -> Self {
        self.fallback = Fallback::List(list);
        self
    }

    /// Raises `flag` whenever the driver is queried.
    pub fn tripping(mut self, flag: Arc<AtomicBool>) -> Self {
        self.trip = Some(flag);
        self
    }

    pub fn capacities(&self) -> Vec<usize> {
        self.capacities.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.capacities.lock().unwrap().len()
    }
}

impl DeviceChannel for FakeDriver {
    fn query_bssid_list(&mut self, out: &mut [u8]) -> DriverResponse {
        self.capacities.lock().unwrap().push(out.len());
        if let Some(flag) = &self.trip {
            flag.store(true, Ordering::SeqCst);
        }

        if let Some(response) = self.script.pop_front() {
            return response;
        }
        match &self.fallback {
            Fallback::Status(status) => DriverResponse { status: *status, bytes: 0 },
            Fallback::List(list) if list.len() <= out.len() => {
                out[..list.len()].copy_from_slice(list);
                DriverResponse { status: ndis::ERROR_SUCCESS, bytes: list.len() }
            }
            Fallback::List(list) => DriverResponse { status: ndis::ERROR_MORE_DATA, bytes: list.len() },
        }
    }
}

/// Counts itself as an open handle until dropped.
struct FakeHandle {
    driver: FakeDriver,
    open_handles: Arc<AtomicUsize>,
}

impl DeviceChannel for FakeHandle {
    fn query_bssid_list(&mut self, out: &mut [u8]) -> DriverResponse {
        self.driver.query_bssid_list(out)
    }
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeNamespace {
    mappings: Mutex<HashMap<String, String>>,
    drivers: HashMap<String, FakeDriver>,
    silent_define: bool,
    lookup_error: bool,
    defines: AtomicUsize,
    removals: AtomicUsize,
    opens: AtomicUsize,
    open_handles: Arc<AtomicUsize>,
}

impl FakeNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_driver(mut self, name: &str, driver: FakeDriver) -> Self {
        self.drivers.insert(name.to_string(), driver);
        self
    }

    pub fn with_mapping(self, name: &str, target: &str) -> Self {
        self.mappings
            .lock()
            .unwrap()
            .insert(name.to_string(), target.to_string());
        self
    }

    /// `define_mapping` reports success without defining anything.
    pub fn with_silent_define(mut self) -> Self {
        self.silent_define = true;
        self
    }

    pub fn with_lookup_error(mut self) -> Self {
        self.lookup_error = true;
        self
    }

    pub fn mapping(&self, name: &str) -> Option<String> {
        self.mappings.lock().unwrap().get(name).cloned()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.lock().unwrap().len()
    }

    pub fn defines(&self) -> usize {
        self.defines.load(Ordering::SeqCst)
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }
}

impl DeviceNamespace for FakeNamespace {
    fn query_mapping(&self, dos_name: &str) -> io::Result<MappingState> {
        if self.lookup_error {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Ok(match self.mapping(dos_name) {
            Some(target) => MappingState::Target(target),
            None => MappingState::Absent,
        })
    }

    fn define_mapping(&self, dos_name: &str, target: &str) -> io::Result<()> {
        self.defines.fetch_add(1, Ordering::SeqCst);
        if !self.silent_define {
            self.mappings
                .lock()
                .unwrap()
                .insert(dos_name.to_string(), target.to_string());
        }
        Ok(())
    }

    fn remove_mapping(&self, dos_name: &str, target: &str) -> io::Result<()> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        let mut mappings = self.mappings.lock().unwrap();
        match mappings.get(dos_name) {
            Some(current) if current == target => {
                mappings.remove(dos_name);
                Ok(())
            }
            _ => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn open_channel(&self, path: &str) -> io::Result<Box<dyn DeviceChannel>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let name: &str = path.strip_prefix(r"\\.\").unwrap_or(path);

        // The handle only resolves through a mapping to the adapter's device.
        if self.mapping(name).as_deref() != Some(format!(r"\Device\{name}").as_str()) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        let driver: FakeDriver = self
            .drivers
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;

        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeHandle {
            driver,
            open_handles: Arc::clone(&self.open_handles),
        }))
    }
}
