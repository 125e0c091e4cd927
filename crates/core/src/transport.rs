//! The transport state machine.
//!
//! A transport cycles forever through
//!
//! ```text
//! Arrived(empty) → loading → CargoLoaded → Departed → Arrived(full)
//!       ↑                                                  │
//!       └── Departed ← CargoUnloaded ← unloading ←─────────┘
//! ```
//!
//! Loading is the only step that can block: an empty transport parks on
//! the warehouse until cargo shows up. Everything else runs to completion
//! and schedules the next event.

use crate::{Network, TransportError, TransportEvent, Warehouse};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use tycoon_routing::Itinerary;
use tycoon_simulation::{EntityId, Event};
use tycoon_types::{Cargo, Duration, LocationCode, ShipmentMode};

/// What kind of vehicle a transport is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Truck,
    Vessel,
}

impl TransportKind {
    /// Get the upper-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Truck => "TRUCK",
            TransportKind::Vessel => "VESSEL",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed characteristics of a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSpec {
    pub kind: TransportKind,
    pub mode: ShipmentMode,
    /// Maximum number of cargo items carried at once.
    pub capacity: usize,
    pub load_duration: Duration,
    pub unload_duration: Duration,
    /// Delay between finishing loading or unloading and leaving.
    pub depart_after: Duration,
}

impl TransportSpec {
    /// A land transport carrying one item with no handling time.
    pub fn truck() -> Self {
        Self {
            kind: TransportKind::Truck,
            mode: ShipmentMode::Land,
            capacity: 1,
            load_duration: Duration::ZERO,
            unload_duration: Duration::ZERO,
            depart_after: Duration::ZERO,
        }
    }

    /// A sea transport carrying four items, one hour to load and to unload.
    pub fn vessel() -> Self {
        Self {
            kind: TransportKind::Vessel,
            mode: ShipmentMode::Sea,
            capacity: 4,
            load_duration: Duration::hours(1),
            unload_duration: Duration::hours(1),
            depart_after: Duration::ZERO,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_load_duration(mut self, duration: Duration) -> Self {
        self.load_duration = duration;
        self
    }

    pub fn with_unload_duration(mut self, duration: Duration) -> Self {
        self.unload_duration = duration;
        self
    }

    pub fn with_depart_after(mut self, delay: Duration) -> Self {
        self.depart_after = delay;
        self
    }
}

/// A truck or vessel moving cargo between warehouses.
#[derive(Debug)]
pub struct Transport {
    id: EntityId,
    name: String,
    spec: TransportSpec,
    hold: Vec<Cargo>,
    itinerary: Option<Itinerary>,
}

impl Transport {
    pub fn new(id: EntityId, name: impl Into<String>, spec: TransportSpec) -> Self {
        Self {
            id,
            name: name.into(),
            spec,
            hold: Vec::new(),
            itinerary: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &TransportSpec {
        &self.spec
    }

    /// Cargo currently on board, in loading order.
    pub fn hold(&self) -> &[Cargo] {
        &self.hold
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        self.itinerary.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.hold.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.hold.len() >= self.spec.capacity
    }

    /// Place the transport at `warehouse` by scheduling its first arrival.
    pub fn start_journey_from(
        &self,
        warehouse: &Warehouse,
        network: &Network,
    ) -> Result<(), TransportError> {
        info!(transport = %self, at = %warehouse.location_code(), "Starting journey");
        network.sim.schedule(
            self.id,
            TransportEvent::Arrived {
                at: warehouse.location_code().clone(),
                cargo: Vec::new(),
            },
            Duration::ZERO,
        )?;
        Ok(())
    }

    /// Handle one of this transport's events.
    pub async fn when(
        &mut self,
        event: Event<TransportEvent>,
        network: &Network,
    ) -> Result<(), TransportError> {
        match event.into_kind() {
            TransportEvent::Arrived { at, .. } => self.when_arrived(at, network).await,
            TransportEvent::CargoLoaded { at, .. } => self.when_loaded(at, network),
            TransportEvent::Departed { to, travel, .. } => self.when_departed(to, travel, network),
            TransportEvent::CargoUnloaded { .. } => self.come_back(network),
        }
    }

    async fn when_arrived(
        &mut self,
        at: LocationCode,
        network: &Network,
    ) -> Result<(), TransportError> {
        let warehouse = network.warehouses.require(at.as_str())?;

        if self.is_empty() {
            self.load_cargo_from(warehouse).await?;
            network.sim.schedule(
                self.id,
                TransportEvent::CargoLoaded {
                    at,
                    cargo: self.hold.clone(),
                    duration: self.spec.load_duration,
                },
                self.spec.load_duration,
            )?;
        } else {
            let delivered = self.unload_cargo_to(warehouse)?;
            network.sim.schedule(
                self.id,
                TransportEvent::CargoUnloaded {
                    at,
                    cargo: delivered,
                    duration: self.spec.unload_duration,
                },
                self.spec.unload_duration,
            )?;
        }
        Ok(())
    }

    /// Fill the hold from `warehouse`.
    ///
    /// Leaves as soon as the hold is full, or as soon as the warehouse runs
    /// dry with at least one item on board. An empty transport waits for
    /// cargo instead.
    async fn load_cargo_from(&mut self, warehouse: &Warehouse) -> Result<(), TransportError> {
        while !self.is_full() {
            if let Some(cargo) = warehouse.pick_cargo() {
                debug!(transport = %self, %cargo, "Loaded cargo");
                self.hold.push(cargo);
            } else if self.is_empty() {
                warehouse.wait_for_cargo().await?;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Hand every item in the hold to `warehouse`, oldest first.
    fn unload_cargo_to(&mut self, warehouse: &Warehouse) -> Result<Vec<Cargo>, TransportError> {
        let delivered = std::mem::take(&mut self.hold);
        for cargo in &delivered {
            warehouse.bring(cargo.clone())?;
        }
        debug!(transport = %self, count = delivered.len(), at = %warehouse.location_code(), "Unloaded cargo");
        Ok(delivered)
    }

    fn when_loaded(&mut self, at: LocationCode, network: &Network) -> Result<(), TransportError> {
        let Some(first) = self.hold.first() else {
            return Err(TransportError::NoCargo {
                transport: self.name.clone(),
            });
        };
        let to = first.destination.clone();
        self.assign_itinerary(at, to, network)?;
        self.depart(network)
    }

    /// Route towards `to`, cut down to the leg this transport can travel.
    fn assign_itinerary(
        &mut self,
        from: LocationCode,
        to: LocationCode,
        network: &Network,
    ) -> Result<(), TransportError> {
        let itinerary = network
            .map
            .find_itinerary(from.as_str(), to.as_str())
            .for_ship_by(self.spec.mode);
        if itinerary.is_empty() {
            return Err(TransportError::RouteNotFound {
                from,
                to,
                mode: self.spec.mode,
            });
        }

        debug!(transport = %self, %itinerary, "Assigned itinerary");
        self.itinerary = Some(itinerary);
        Ok(())
    }

    fn come_back(&mut self, network: &Network) -> Result<(), TransportError> {
        let way_back = self
            .itinerary
            .as_ref()
            .map(Itinerary::for_come_back)
            .ok_or_else(|| TransportError::NoItinerary {
                transport: self.name.clone(),
            })?;

        debug!(transport = %self, itinerary = %way_back, "Reassigned itinerary to come back");
        self.itinerary = Some(way_back);
        self.depart(network)
    }

    fn depart(&self, network: &Network) -> Result<(), TransportError> {
        let no_itinerary = || TransportError::NoItinerary {
            transport: self.name.clone(),
        };
        let itinerary = self.itinerary.as_ref().ok_or_else(no_itinerary)?;
        let (Some(from), Some(to)) = (itinerary.origin(), itinerary.destination()) else {
            return Err(no_itinerary());
        };

        network.sim.schedule(
            self.id,
            TransportEvent::Departed {
                from: from.clone(),
                to: to.clone(),
                travel: itinerary.total_time_to_travel(),
                cargo: self.hold.clone(),
            },
            self.spec.depart_after,
        )?;
        Ok(())
    }

    fn when_departed(
        &self,
        to: LocationCode,
        travel: Duration,
        network: &Network,
    ) -> Result<(), TransportError> {
        network.sim.schedule(
            self.id,
            TransportEvent::Arrived {
                at: to,
                cargo: self.hold.clone(),
            },
            travel,
        )?;
        Ok(())
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.spec.kind, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Warehouses;
    use tycoon_simulation::Simulator;
    use tycoon_test_helpers::{cargo_to, reference_map};
    use tycoon_types::Time;

    fn network() -> Network {
        let sim = Simulator::new(Time::EPOCH);
        let mut warehouses = Warehouses::new();
        for location in ["FACTORY", "PORT", "A", "B"] {
            warehouses.insert(Warehouse::new(location, sim.processes().clone()));
        }
        Network::new(sim, reference_map(Duration::hours(4)), warehouses)
    }

    fn arrived_at(at: &str) -> Event<TransportEvent> {
        Event::new(
            EntityId(0),
            Time::EPOCH,
            TransportEvent::Arrived {
                at: at.into(),
                cargo: Vec::new(),
            },
        )
    }

    #[test]
    fn test_presets() {
        let truck = TransportSpec::truck();
        assert_eq!(truck.mode, ShipmentMode::Land);
        assert_eq!(truck.capacity, 1);
        assert!(truck.load_duration.is_zero());

        let vessel = TransportSpec::vessel().with_capacity(2).with_depart_after(Duration::hours(1));
        assert_eq!(vessel.kind, TransportKind::Vessel);
        assert_eq!(vessel.capacity, 2);
        assert_eq!(vessel.unload_duration, Duration::hours(1));
        assert_eq!(vessel.depart_after, Duration::hours(1));
    }

    #[tokio::test]
    async fn test_arrival_loads_up_to_capacity() {
        let network = network();
        let factory = network.warehouses.require("FACTORY").unwrap();
        for i in 0..3 {
            factory.bring(cargo_to(i, "B")).unwrap();
        }

        let spec = TransportSpec::truck().with_capacity(2).with_load_duration(Duration::hours(1));
        let mut truck = Transport::new(EntityId(0), "Truck 1", spec);
        truck.when(arrived_at("FACTORY"), &network).await.unwrap();

        assert_eq!(truck.hold().len(), 2);
        assert_eq!(factory.fullness(), 1);
        assert_eq!(network.sim.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_load_when_warehouse_runs_dry() {
        let network = network();
        let port = network.warehouses.require("PORT").unwrap();
        port.bring(cargo_to(0, "A")).unwrap();

        let mut vessel = Transport::new(EntityId(0), "Vessel", TransportSpec::vessel());
        vessel.when(arrived_at("PORT"), &network).await.unwrap();

        assert_eq!(vessel.hold().len(), 1);
        assert!(!vessel.is_full());
    }

    #[tokio::test]
    async fn test_loaded_assigns_single_mode_leg() {
        let network = network();
        let mut truck = Transport::new(EntityId(0), "Truck 1", TransportSpec::truck());
        truck.hold.push(cargo_to(0, "A"));

        let loaded = Event::new(
            EntityId(0),
            Time::EPOCH,
            TransportEvent::CargoLoaded {
                at: "FACTORY".into(),
                cargo: truck.hold.clone(),
                duration: Duration::ZERO,
            },
        );
        truck.when(loaded, &network).await.unwrap();

        let itinerary = truck.itinerary().unwrap();
        assert_eq!(itinerary.origin().unwrap(), "FACTORY");
        assert_eq!(itinerary.destination().unwrap(), "PORT");
        assert_eq!(itinerary.total_time_to_travel(), Duration::hours(1));
    }

    #[tokio::test]
    async fn test_no_route_in_own_mode_is_fatal() {
        let network = network();
        let mut vessel = Transport::new(EntityId(0), "Vessel", TransportSpec::vessel());
        vessel.hold.push(cargo_to(0, "B"));

        let loaded = Event::new(
            EntityId(0),
            Time::EPOCH,
            TransportEvent::CargoLoaded {
                at: "PORT".into(),
                cargo: vessel.hold.clone(),
                duration: Duration::hours(1),
            },
        );
        let err = vessel.when(loaded, &network).await.unwrap_err();

        assert!(matches!(
            err,
            TransportError::RouteNotFound { ref from, ref to, mode: ShipmentMode::Sea }
                if from == "PORT" && to == "B"
        ));
    }

    #[tokio::test]
    async fn test_arriving_full_unloads_in_order() {
        let network = network();
        let mut truck = Transport::new(EntityId(0), "Truck 1", TransportSpec::truck().with_capacity(2));
        truck.hold.push(cargo_to(0, "B"));
        truck.hold.push(cargo_to(1, "B"));

        truck.when(arrived_at("B"), &network).await.unwrap();

        assert!(truck.is_empty());
        let stored: Vec<u32> = network
            .warehouses
            .require("B")
            .unwrap()
            .cargo()
            .iter()
            .map(|cargo| cargo.track_number.0)
            .collect();
        assert_eq!(stored, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_unknown_warehouse_is_reported() {
        let network = network();
        let mut truck = Transport::new(EntityId(0), "Truck 1", TransportSpec::truck());
        let err = truck.when(arrived_at("ATLANTIS"), &network).await.unwrap_err();
        assert!(matches!(err, TransportError::UnknownWarehouse(code) if code == "ATLANTIS"));
    }

    #[tokio::test]
    async fn test_come_back_without_itinerary_is_an_error() {
        let network = network();
        let mut truck = Transport::new(EntityId(0), "Truck 1", TransportSpec::truck());
        let unloaded = Event::new(
            EntityId(0),
            Time::EPOCH,
            TransportEvent::CargoUnloaded {
                at: "B".into(),
                cargo: Vec::new(),
                duration: Duration::ZERO,
            },
        );
        let err = truck.when(unloaded, &network).await.unwrap_err();
        assert!(matches!(err, TransportError::NoItinerary { .. }));
    }

    #[test]
    fn test_display_names_kind_and_name() {
        let vessel = Transport::new(EntityId(2), "Vessel", TransportSpec::vessel());
        assert_eq!(vessel.to_string(), "VESSEL(Vessel)");
    }
}
