//! Shared domain types for `apscan`.
//!
//! Everything in here is plain data: interface identifiers, access point
//! records, configuration, and the vendor lookup port. No crate in the
//! workspace talks to a driver from here.

pub mod config;
pub mod network;
pub mod vendors;
