//! The delivery network graph.

use crate::{Itinerary, Segment};
use indexmap::{IndexMap, IndexSet};
use tracing::trace;
use tycoon_types::{Duration, LocationCode, ShipmentMode};

/// Undirected graph of locations connected by mode-tagged segments.
///
/// Neighbours are kept in the order they were first linked, which fixes
/// the order the depth-first search explores them in.
#[derive(Debug, Clone, Default)]
pub struct TransportMap {
    links: IndexMap<LocationCode, IndexMap<LocationCode, Segment>>,
}

impl TransportMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `a` and `b` in both directions.
    ///
    /// Linking the same pair again replaces the earlier segments but keeps
    /// their position among each location's neighbours.
    pub fn link(
        &mut self,
        a: impl Into<LocationCode>,
        b: impl Into<LocationCode>,
        travel: Duration,
        mode: ShipmentMode,
    ) -> &mut Self {
        let segment = Segment::new(a, b, travel, mode);
        let reverse = segment.reversed();
        self.links
            .entry(segment.origin.clone())
            .or_default()
            .insert(segment.destination.clone(), segment);
        self.links
            .entry(reverse.origin.clone())
            .or_default()
            .insert(reverse.destination.clone(), reverse);
        self
    }

    pub fn by_land(
        &mut self,
        a: impl Into<LocationCode>,
        b: impl Into<LocationCode>,
        travel: Duration,
    ) -> &mut Self {
        self.link(a, b, travel, ShipmentMode::Land)
    }

    pub fn by_sea(
        &mut self,
        a: impl Into<LocationCode>,
        b: impl Into<LocationCode>,
        travel: Duration,
    ) -> &mut Self {
        self.link(a, b, travel, ShipmentMode::Sea)
    }

    /// Check whether `location` has at least one link.
    pub fn contains(&self, location: &str) -> bool {
        self.links.contains_key(location)
    }

    /// Every linked location, in the order first seen.
    pub fn locations(&self) -> impl Iterator<Item = &LocationCode> {
        self.links.keys()
    }

    /// The direct segment from `origin` to `destination`, if any.
    pub fn segment(&self, origin: &str, destination: &str) -> Option<&Segment> {
        self.links.get(origin)?.get(destination)
    }

    /// Depth-first search for a route from `origin` to `destination`.
    ///
    /// At every location a direct segment to the destination is taken
    /// first; otherwise unvisited neighbours are tried in link order and the
    /// first route found wins, shortest or not. Returns an empty itinerary
    /// when `origin` is unknown, equals `destination`, or cannot reach it.
    pub fn find_itinerary(&self, origin: &str, destination: &str) -> Itinerary {
        if origin == destination || !self.contains(origin) {
            return Itinerary::empty();
        }

        let mut visited = IndexSet::new();
        let mut path = Vec::new();
        if self.search(origin, destination, &mut visited, &mut path) {
            trace!(origin, destination, hops = path.len(), "Found itinerary");
            Itinerary::new(path)
        } else {
            trace!(origin, destination, "No itinerary");
            Itinerary::empty()
        }
    }

    fn search<'a>(
        &'a self,
        at: &'a str,
        destination: &str,
        visited: &mut IndexSet<&'a str>,
        path: &mut Vec<Segment>,
    ) -> bool {
        visited.insert(at);
        let Some(neighbours) = self.links.get(at) else {
            return false;
        };

        if let Some(direct) = neighbours.get(destination) {
            path.push(direct.clone());
            return true;
        }

        for (next, segment) in neighbours {
            if visited.contains(next.as_str()) {
                continue;
            }
            path.push(segment.clone());
            if self.search(next.as_str(), destination, visited, path) {
                return true;
            }
            path.pop();
        }
        false
    }
}
