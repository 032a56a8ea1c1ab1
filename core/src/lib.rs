//! # Access point enumeration engine
//!
//! Talks to every wireless adapter's NDIS driver and collects the BSSID list
//! each one reports.
//!
//! * [`directory`]: which interfaces to query.
//! * [`session`]: DOS device mapping and driver channel lifecycle.
//! * [`query`]: the adaptive buffer-sizing query loop.
//! * [`enumerator`]: runs the above across all interfaces and computes the verdict.
//! * [`survey`]: enumeration plus vendor enrichment for presentation.
//! * [`platform`]: the real OS backend, where one exists.

pub mod directory;
pub mod enumerator;
pub mod error;
pub mod platform;
pub mod query;
pub mod session;
pub mod survey;
pub mod vendors;

#[cfg(test)]
mod testing;
