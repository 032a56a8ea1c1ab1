//! A simulated NDIS stack: adapters with a fixed behaviour behind an
//! in-memory DOS device namespace.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use apscan_core::directory::StaticRegistry;
use apscan_core::enumerator::Enumerator;
use apscan_core::session::{DeviceChannel, DeviceNamespace, DriverResponse, MappingState};
use apscan_protocols::bssid::BssidListWriter;
use apscan_protocols::ndis;

/// How one simulated adapter answers a BSSID list query.
#[derive(Debug, Clone)]
pub enum Adapter {
    /// A wireless card that sees these access points.
    Wireless(Vec<Beacon>),
    /// A card that answers every query with the same status, e.g. a wired one.
    Status(u32),
    /// Keeps asking for twice the buffer it was given.
    Greedy,
    /// Registered but without a device object behind it.
    Missing,
}

#[derive(Debug, Clone)]
pub struct Beacon {
    pub mac: [u8; 6],
    pub rssi: i32,
    pub ssid: String,
}

pub fn beacon(mac: [u8; 6], rssi: i32, ssid: &str) -> Beacon {
    Beacon {
        mac,
        rssi,
        ssid: ssid.to_string(),
    }
}

/// `count` access points with distinct BSSIDs.
pub fn crowded(count: usize) -> Vec<Beacon> {
    (0..count)
        .map(|i| beacon([0x02, 0, 0, 0, (i >> 8) as u8, i as u8], -30 - (i % 60) as i32, &format!("ap-{i}")))
        .collect()
}

pub fn encode(beacons: &[Beacon]) -> Vec<u8> {
    beacons
        .iter()
        .fold(BssidListWriter::new(), |writer, b| writer.push(b.mac, b.rssi, b.ssid.as_bytes()))
        .finish()
}

struct Channel {
    adapter: Adapter,
    offered: Arc<Mutex<Vec<usize>>>,
    open_handles: Arc<AtomicUsize>,
}

impl DeviceChannel for Channel {
    fn query_bssid_list(&mut self, out: &mut [u8]) -> DriverResponse {
        self.offered.lock().unwrap().push(out.len());
        match &self.adapter {
            Adapter::Wireless(beacons) => {
                let list: Vec<u8> = encode(beacons);
                if list.len() > out.len() {
                    return DriverResponse {
                        status: ndis::ERROR_MORE_DATA,
                        bytes: list.len(),
                    };
                }
                out[..list.len()].copy_from_slice(&list);
                DriverResponse {
                    status: ndis::ERROR_SUCCESS,
                    bytes: list.len(),
                }
            }
            Adapter::Status(status) => DriverResponse {
                status: *status,
                bytes: 0,
            },
            Adapter::Greedy => DriverResponse {
                status: ndis::ERROR_INSUFFICIENT_BUFFER,
                bytes: out.len() * 2,
            },
            Adapter::Missing => DriverResponse {
                status: ndis::ERROR_DEVICE_NOT_CONNECTED,
                bytes: 0,
            },
        }
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The device namespace of a machine with the given adapters installed.
#[derive(Default)]
pub struct SimulatedStack {
    order: Vec<String>,
    adapters: HashMap<String, Adapter>,
    offered: HashMap<String, Arc<Mutex<Vec<usize>>>>,
    mappings: Mutex<HashMap<String, String>>,
    open_handles: Arc<AtomicUsize>,
    peak_handles: AtomicUsize,
}

impl SimulatedStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adapter(mut self, name: &str, adapter: Adapter) -> Self {
        self.order.push(name.to_string());
        self.offered.insert(name.to_string(), Arc::default());
        self.adapters.insert(name.to_string(), adapter);
        self
    }

    /// A DOS device name some other program already owns.
    pub fn foreign_mapping(self, name: &str, target: &str) -> Self {
        self.mappings
            .lock()
            .unwrap()
            .insert(name.to_string(), target.to_string());
        self
    }

    /// Buffer sizes offered to one adapter, in call order.
    pub fn offered(&self, name: &str) -> Vec<usize> {
        self.offered
            .get(name)
            .map(|sizes| sizes.lock().unwrap().clone())
            .unwrap_or_default()
    }

    pub fn mapping(&self, name: &str) -> Option<String> {
        self.mappings.lock().unwrap().get(name).cloned()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.lock().unwrap().len()
    }

    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    pub fn peak_handles(&self) -> usize {
        self.peak_handles.load(Ordering::SeqCst)
    }

    /// An enumerator over every installed adapter, in installation order.
    pub fn enumerator(self: &Arc<Self>) -> Enumerator {
        let registry = StaticRegistry::new(self.order.clone());
        let namespace: Arc<dyn DeviceNamespace> = self.clone();
        Enumerator::new(Box::new(registry), namespace)
    }
}

impl DeviceNamespace for SimulatedStack {
    fn query_mapping(&self, dos_name: &str) -> io::Result<MappingState> {
        Ok(match self.mapping(dos_name) {
            Some(target) => MappingState::Target(target),
            None => MappingState::Absent,
        })
    }

    fn define_mapping(&self, dos_name: &str, target: &str) -> io::Result<()> {
        self.mappings
            .lock()
            .unwrap()
            .insert(dos_name.to_string(), target.to_string());
        Ok(())
    }

    fn remove_mapping(&self, dos_name: &str, target: &str) -> io::Result<()> {
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
        let name: &str = path.strip_prefix(r"\\.\").unwrap_or(path);
        let expected: String = format!(r"\Device\{name}");
        if self.mapping(name).as_deref() != Some(expected.as_str()) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        let adapter: Adapter = match self.adapters.get(name) {
            None | Some(Adapter::Missing) => return Err(io::Error::from(io::ErrorKind::NotFound)),
            Some(adapter) => adapter.clone(),
        };

        let open: usize = self.open_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_handles.fetch_max(open, Ordering::SeqCst);
        Ok(Box::new(Channel {
            adapter,
            offered: self.offered.get(name).cloned().unwrap_or_default(),
            open_handles: self.open_handles.clone(),
        }))
    }
}
