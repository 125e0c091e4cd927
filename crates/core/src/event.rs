//! Transport events.

use tycoon_types::{Cargo, Duration, LocationCode};

/// Everything that can happen to a transport.
///
/// Each variant carries the cargo manifest at the moment it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Reached the warehouse at `at`.
    Arrived { at: LocationCode, cargo: Vec<Cargo> },

    /// Finished taking `cargo` on board at `at`.
    CargoLoaded {
        at: LocationCode,
        cargo: Vec<Cargo>,
        duration: Duration,
    },

    /// Left `from` for `to`, due to arrive after `travel`.
    Departed {
        from: LocationCode,
        to: LocationCode,
        travel: Duration,
        cargo: Vec<Cargo>,
    },

    /// Finished handing `cargo` over to the warehouse at `at`.
    CargoUnloaded {
        at: LocationCode,
        cargo: Vec<Cargo>,
        duration: Duration,
    },
}

impl TransportEvent {
    /// Where the transport was when the event occurred.
    pub fn location(&self) -> &LocationCode {
        match self {
            TransportEvent::Arrived { at, .. }
            | TransportEvent::CargoLoaded { at, .. }
            | TransportEvent::CargoUnloaded { at, .. } => at,
            TransportEvent::Departed { from, .. } => from,
        }
    }

    /// The cargo manifest.
    pub fn cargo(&self) -> &[Cargo] {
        match self {
            TransportEvent::Arrived { cargo, .. }
            | TransportEvent::CargoLoaded { cargo, .. }
            | TransportEvent::Departed { cargo, .. }
            | TransportEvent::CargoUnloaded { cargo, .. } => cargo,
        }
    }

    /// Get a short name for this event kind.
    pub fn name(&self) -> &'static str {
        match self {
            TransportEvent::Arrived { .. } => "Arrived",
            TransportEvent::CargoLoaded { .. } => "CargoLoaded",
            TransportEvent::Departed { .. } => "Departed",
            TransportEvent::CargoUnloaded { .. } => "CargoUnloaded",
        }
    }
}
