//! Win32 implementations of the adapter registry and the device namespace.
//!
//! Adapters are listed under `HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion\NetworkCards`,
//! one numbered subkey per card. Their drivers live under `\Device\<ServiceName>`
//! in the object manager and become openable once a DOS device name points there.

use std::ffi::c_void;
use std::io;
use std::mem::size_of;

use ::windows::Win32::Foundation::{
    CloseHandle, ERROR_FILE_NOT_FOUND, ERROR_INSUFFICIENT_BUFFER, ERROR_NO_MORE_ITEMS,
    ERROR_SUCCESS, GENERIC_READ, GetLastError, HANDLE, WIN32_ERROR,
};
use ::windows::Win32::Storage::FileSystem::{
    CreateFileW, DDD_EXACT_MATCH_ON_REMOVE, DEFINE_DOS_DEVICE_FLAGS, DDD_RAW_TARGET_PATH, DDD_REMOVE_DEFINITION, DefineDosDeviceW,
    FILE_FLAGS_AND_ATTRIBUTES, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING, QueryDosDeviceW,
};
use ::windows::Win32::System::IO::DeviceIoControl;
use ::windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_READ, RRF_RT_REG_SZ, RegCloseKey, RegEnumKeyExW, RegGetValueW, RegOpenKeyExW,
};
use ::windows::core::{PCWSTR, PWSTR};
use apscan_protocols::ndis;
use tracing::trace;

use crate::directory::{self, AdapterEntry, AdapterRegistry};
use crate::error::DirectoryError;
use crate::session::{DeviceChannel, DeviceNamespace, DriverResponse, MappingState};

const NETWORK_CARDS_KEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion\NetworkCards";
const SERVICE_NAME_VALUE: &str = "ServiceName";

/// Registry key names are at most 255 characters.
const MAX_KEY_LEN: usize = 256;
/// Largest `QueryDosDeviceW` answer we are willing to read, in UTF-16 units.
const MAX_TARGET_LEN: usize = 1 << 15;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn win32_io_error(status: WIN32_ERROR) -> io::Error {
    io::Error::from_raw_os_error(status.0 as i32)
}

/// The error a failed call already captured, without asking `GetLastError` again.
fn captured_io_error(e: ::windows::core::Error) -> io::Error {
    io::Error::from_raw_os_error(ndis::status_from_hresult(e.code().0 as u32) as i32)
}

/// Open registry key, closed on drop.
struct RegKey(HKEY);

impl RegKey {
    fn open(parent: HKEY, path: &str) -> io::Result<Self> {
        let path: Vec<u16> = wide(path);
        let mut key: HKEY = HKEY::default();
        let status: WIN32_ERROR = unsafe { RegOpenKeyExW(parent, PCWSTR(path.as_ptr()), 0, KEY_READ, &mut key) };
        if status != ERROR_SUCCESS {
            return Err(win32_io_error(status));
        }
        Ok(Self(key))
    }

    fn subkey_name(&self, index: u32) -> io::Result<Option<String>> {
        let mut name: [u16; MAX_KEY_LEN] = [0; MAX_KEY_LEN];
        let mut len: u32 = name.len() as u32;
        let status: WIN32_ERROR = unsafe {
            RegEnumKeyExW(
                self.0,
                index,
                PWSTR(name.as_mut_ptr()),
                &mut len,
                None,
                PWSTR::null(),
                None,
                None,
            )
        };
        match status {
            ERROR_SUCCESS => Ok(Some(String::from_utf16_lossy(&name[..len as usize]))),
            ERROR_NO_MORE_ITEMS => Ok(None),
            other => Err(win32_io_error(other)),
        }
    }

    /// Reads a `REG_SZ` value from `subkey`; `None` when it does not exist.
    fn string_value(&self, subkey: &str, value: &str) -> io::Result<Option<String>> {
        let subkey: Vec<u16> = wide(subkey);
        let value: Vec<u16> = wide(value);

        let mut size: u32 = 0;
        let status: WIN32_ERROR = unsafe {
            RegGetValueW(
                self.0,
                PCWSTR(subkey.as_ptr()),
                PCWSTR(value.as_ptr()),
                RRF_RT_REG_SZ,
                None,
                None,
                Some(std::ptr::from_mut(&mut size)),
            )
        };
        match status {
            ERROR_SUCCESS => {}
            ERROR_FILE_NOT_FOUND => return Ok(None),
            other => return Err(win32_io_error(other)),
        }

        let mut data: Vec<u16> = vec![0; (size as usize).div_ceil(2)];
        let status: WIN32_ERROR = unsafe {
            RegGetValueW(
                self.0,
                PCWSTR(subkey.as_ptr()),
                PCWSTR(value.as_ptr()),
                RRF_RT_REG_SZ,
                None,
                Some(data.as_mut_ptr().cast::<c_void>()),
                Some(std::ptr::from_mut(&mut size)),
            )
        };
        if status != ERROR_SUCCESS {
            return Err(win32_io_error(status));
        }

        let len: usize = data.iter().position(|&c| c == 0).unwrap_or(data.len());
        Ok(Some(String::from_utf16_lossy(&data[..len])))
    }
}

impl Drop for RegKey {
    fn drop(&mut self) {
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

/// Lists the `ServiceName` of every subkey of `NetworkCards`.
pub struct NetworkCardsRegistry;

impl AdapterRegistry for NetworkCardsRegistry {
    fn adapters(&self) -> Result<Vec<AdapterEntry>, DirectoryError> {
        let cards: RegKey = RegKey::open(HKEY_LOCAL_MACHINE, NETWORK_CARDS_KEY).map_err(DirectoryError::Unavailable)?;

        directory::collect_adapters(
            |index| cards.subkey_name(index),
            |key| cards.string_value(key, SERVICE_NAME_VALUE),
        )
    }
}

/// DOS device names and raw NDIS handles.
pub struct NdisNamespace;

impl DeviceNamespace for NdisNamespace {
    fn query_mapping(&self, dos_name: &str) -> io::Result<MappingState> {
        let name: Vec<u16> = wide(dos_name);
        let mut target: Vec<u16> = vec![0; 1024];

        loop {
            let written: u32 = unsafe { QueryDosDeviceW(PCWSTR(name.as_ptr()), Some(&mut target)) };
            if written > 0 {
                // The answer is a list of NUL terminated strings; the first is the active one.
                let len: usize = target.iter().position(|&c| c == 0).unwrap_or(written as usize);
                return Ok(MappingState::Target(String::from_utf16_lossy(&target[..len])));
            }

            let status: WIN32_ERROR = unsafe { GetLastError() };
            match status {
                ERROR_FILE_NOT_FOUND => return Ok(MappingState::Absent),
                ERROR_INSUFFICIENT_BUFFER if target.len() < MAX_TARGET_LEN => {
                    target = vec![0; target.len() * 2];
                }
                other => return Err(win32_io_error(other)),
            }
        }
    }

    fn define_mapping(&self, dos_name: &str, target: &str) -> io::Result<()> {
        let name: Vec<u16> = wide(dos_name);
        let target: Vec<u16> = wide(target);
        unsafe { DefineDosDeviceW(DDD_RAW_TARGET_PATH, PCWSTR(name.as_ptr()), PCWSTR(target.as_ptr())) }
            .map_err(captured_io_error)
    }

    fn remove_mapping(&self, dos_name: &str, target: &str) -> io::Result<()> {
        let name: Vec<u16> = wide(dos_name);
        let target: Vec<u16> = wide(target);
        let flags: DEFINE_DOS_DEVICE_FLAGS = DDD_RAW_TARGET_PATH | DDD_REMOVE_DEFINITION | DDD_EXACT_MATCH_ON_REMOVE;
        unsafe { DefineDosDeviceW(flags, PCWSTR(name.as_ptr()), PCWSTR(target.as_ptr())) }
            .map_err(captured_io_error)
    }

    fn open_channel(&self, path: &str) -> io::Result<Box<dyn DeviceChannel>> {
        let path: Vec<u16> = wide(path);
        let handle: HANDLE = unsafe {
            CreateFileW(
                PCWSTR(path.as_ptr()),
                GENERIC_READ.0,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                None,
                OPEN_EXISTING,
                FILE_FLAGS_AND_ATTRIBUTES(0),
                HANDLE::default(),
            )
        }
        .map_err(captured_io_error)?;

        Ok(Box::new(NdisChannel { handle }))
    }
}

/// A driver handle opened for `IOCTL_NDIS_QUERY_GLOBAL_STATS`.
struct NdisChannel {
    handle: HANDLE,
}

// The handle is owned by exactly one session and only used from one thread at a time.
unsafe impl Send for NdisChannel {}

impl DeviceChannel for NdisChannel {
    fn query_bssid_list(&mut self, out: &mut [u8]) -> DriverResponse {
        let oid: u32 = ndis::OID_802_11_BSSID_LIST;
        let capacity: u32 = u32::try_from(out.len()).unwrap_or(u32::MAX);
        let mut returned: u32 = 0;

        let result: ::windows::core::Result<()> = unsafe {
            DeviceIoControl(
                self.handle,
                ndis::IOCTL_NDIS_QUERY_GLOBAL_STATS,
                Some(std::ptr::from_ref(&oid).cast::<c_void>()),
                size_of::<u32>() as u32,
                Some(out.as_mut_ptr().cast::<c_void>()),
                capacity,
                Some(std::ptr::from_mut(&mut returned)),
                None,
            )
        };

        let status: u32 = match result {
            Ok(()) => ndis::ERROR_SUCCESS,
            Err(e) => ndis::status_from_hresult(e.code().0 as u32),
        };
        trace!(status, returned, capacity, "DeviceIoControl");

        DriverResponse {
            status,
            bytes: returned as usize,
        }
    }
}

impl Drop for NdisChannel {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}
