//! Core value types for the Tycoon delivery simulation.
//!
//! Everything here is a plain, immutable value: simulated time points and
//! deltas, location codes, shipment modes and the cargo being delivered.
//! Behaviour lives in the `tycoon-simulation`, `tycoon-routing` and
//! `tycoon-core` crates.

mod cargo;
mod identifiers;
mod time;

pub use cargo::Cargo;
pub use identifiers::{LocationCode, ParseShipmentModeError, ShipmentMode, TrackNumber};
pub use time::{Duration, Time};
