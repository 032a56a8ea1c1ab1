//! Wire formats of the legacy NDIS 802.11 query interface.
//!
//! * [`ndis`]: ioctl and OID codes plus the classification of the status
//!   codes drivers return.
//! * [`bssid`]: the `NDIS_802_11_BSSID_LIST` response layout, decoding and
//!   encoding.

pub mod bssid;
pub mod ndis;
