//! Cargo being delivered through the network.

use crate::{LocationCode, TrackNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cargo item: where it comes from and where it must end up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cargo {
    /// Tracking number, unique within a run.
    pub track_number: TrackNumber,
    /// Warehouse the cargo starts at.
    pub origin: LocationCode,
    /// Warehouse the cargo must be delivered to.
    pub destination: LocationCode,
}

impl Cargo {
    /// Create a new cargo item.
    pub fn new(
        track_number: TrackNumber,
        origin: impl Into<LocationCode>,
        destination: impl Into<LocationCode>,
    ) -> Self {
        Self {
            track_number,
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for Cargo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cargo(#{} {}->{})",
            self.track_number, self.origin, self.destination
        )
    }
}
