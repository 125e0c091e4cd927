//! Segments and the itineraries built from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tycoon_types::{Duration, LocationCode, ShipmentMode};

/// A direct, single-mode connection between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub origin: LocationCode,
    pub destination: LocationCode,
    pub travel: Duration,
    pub mode: ShipmentMode,
}

impl Segment {
    pub fn new(
        origin: impl Into<LocationCode>,
        destination: impl Into<LocationCode>,
        travel: Duration,
        mode: ShipmentMode,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            travel,
            mode,
        }
    }

    /// The same connection travelled the other way.
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
            travel: self.travel,
            mode: self.mode,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{} ({} by {})",
            self.origin, self.destination, self.travel, self.mode
        )
    }
}

/// An ordered path of segments.
///
/// Itineraries produced by [`TransportMap::find_itinerary`] are contiguous:
/// each segment starts where the previous one ended. An empty itinerary
/// means "no route".
///
/// [`TransportMap::find_itinerary`]: crate::TransportMap::find_itinerary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary {
    segments: Vec<Segment>,
}

impl Itinerary {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The itinerary with no segments.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Where the first segment starts, if there is one.
    pub fn origin(&self) -> Option<&LocationCode> {
        self.segments.first().map(|segment| &segment.origin)
    }

    /// Where the last segment ends, if there is one.
    pub fn destination(&self) -> Option<&LocationCode> {
        self.segments.last().map(|segment| &segment.destination)
    }

    /// Sum of every segment's travel duration.
    pub fn total_time_to_travel(&self) -> Duration {
        self.segments.iter().map(|segment| segment.travel).sum()
    }

    /// The longest leading run of segments travelled by `mode`.
    ///
    /// Stops at the first segment of another mode, even if later segments
    /// match again.
    pub fn for_ship_by(&self, mode: ShipmentMode) -> Self {
        Self::new(
            self.segments
                .iter()
                .take_while(|segment| segment.mode == mode)
                .cloned()
                .collect(),
        )
    }

    /// The way back: segments in reverse order, each one reversed.
    ///
    /// The result runs from this itinerary's destination to its origin and
    /// stays contiguous.
    pub fn for_come_back(&self) -> Self {
        Self::new(self.segments.iter().rev().map(Segment::reversed).collect())
    }

    /// Check that each segment starts where the previous one ends.
    pub fn is_contiguous(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].destination == pair[1].origin)
    }
}

impl From<Vec<Segment>> for Itinerary {
    fn from(segments: Vec<Segment>) -> Self {
        Self::new(segments)
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(origin) = self.origin() else {
            return write!(f, "Itinerary(<empty>)");
        };
        write!(f, "Itinerary({origin}")?;
        for segment in &self.segments {
            write!(f, " -> {}", segment.destination)?;
        }
        write!(f, ", {})", self.total_time_to_travel())
    }
}
