//! Delivery network entities.
//!
//! This crate holds the things that live on the simulated timeline:
//!
//! - [`Warehouse`]: a FIFO cargo buffer whose consumers can park until
//!   cargo arrives
//! - [`Transport`]: the load, travel, unload, return cycle shared by trucks
//!   and vessels
//! - [`Fleet`]: routes every [`TransportEvent`] to the transport that owns
//!   it, implementing the engine's [`Dispatch`] seam
//!
//! [`Dispatch`]: tycoon_simulation::Dispatch

mod error;
mod event;
mod fleet;
mod network;
mod transport;
mod warehouse;

pub use error::TransportError;
pub use event::TransportEvent;
pub use fleet::Fleet;
pub use network::Network;
pub use transport::{Transport, TransportKind, TransportSpec};
pub use warehouse::{Warehouse, Warehouses};
