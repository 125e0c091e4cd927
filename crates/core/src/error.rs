//! Error types for the delivery entities.

use thiserror::Error;
use tycoon_simulation::{EntityId, SchedulerError};
use tycoon_types::{LocationCode, ShipmentMode};

/// Errors that abort a delivery run.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No route of the transport's mode leads towards the cargo destination.
    #[error("No {mode} route from {from} to {to}")]
    RouteNotFound {
        from: LocationCode,
        to: LocationCode,
        mode: ShipmentMode,
    },

    /// A location has no warehouse registered for it.
    #[error("Unknown warehouse: {0}")]
    UnknownWarehouse(LocationCode),

    /// An event names a transport the fleet does not have.
    #[error("Unknown transport: {0}")]
    UnknownTransport(EntityId),

    /// A transport finished loading with an empty hold.
    #[error("{transport} has no cargo to route")]
    NoCargo { transport: String },

    /// A transport was told to depart without an assigned itinerary.
    #[error("{transport} has no itinerary to travel")]
    NoItinerary { transport: String },

    /// The engine refused an operation.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
