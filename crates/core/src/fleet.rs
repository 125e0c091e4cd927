//! Event dispatch to the transports of a run.

use crate::{Network, Transport, TransportError, TransportEvent, TransportKind, TransportSpec};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;
use tycoon_simulation::{Dispatch, EntityId, Event, ProcessFuture};

/// Every transport of a run, addressed by [`EntityId`].
///
/// Ids are handed out densely in the order transports are added. Each
/// transport sits behind an async mutex because its loading step holds it
/// across the wait for cargo.
#[derive(Debug)]
pub struct Fleet {
    network: Arc<Network>,
    transports: Vec<Arc<Mutex<Transport>>>,
    roster: Vec<(String, TransportKind)>,
}

impl Fleet {
    pub fn new(network: Arc<Network>) -> Self {
        Self {
            network,
            transports: Vec::new(),
            roster: Vec::new(),
        }
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    /// Add a transport and return its id.
    pub fn add(&mut self, name: impl Into<String>, spec: TransportSpec) -> EntityId {
        let id = EntityId(self.transports.len() as u32);
        let name = name.into();
        self.roster.push((name.clone(), spec.kind));
        self.transports
            .push(Arc::new(Mutex::new(Transport::new(id, name, spec))));
        id
    }

    /// Schedule the first arrival of transport `id` at `location`.
    pub async fn start_journey_from(
        &self,
        id: EntityId,
        location: &str,
    ) -> Result<(), TransportError> {
        let warehouse = self.network.warehouses.require(location)?;
        let transport = self
            .transports
            .get(id.index())
            .ok_or(TransportError::UnknownTransport(id))?;
        transport
            .lock()
            .await
            .start_journey_from(warehouse, &self.network)
    }

    pub fn len(&self) -> usize {
        self.transports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// Name of transport `id`.
    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.roster.get(id.index()).map(|(name, _)| name.as_str())
    }

    /// Kind of transport `id`.
    pub fn kind_of(&self, id: EntityId) -> Option<TransportKind> {
        self.roster.get(id.index()).map(|(_, kind)| *kind)
    }

    /// Name and kind of every transport, indexed by id.
    pub fn roster(&self) -> &[(String, TransportKind)] {
        &self.roster
    }
}

impl Dispatch<TransportEvent> for Fleet {
    type Error = TransportError;

    fn dispatch(&self, event: Event<TransportEvent>) -> ProcessFuture<TransportError> {
        let transport = self.transports.get(event.source().index()).cloned();
        let network = Arc::clone(&self.network);

        Box::pin(async move {
            let Some(transport) = transport else {
                return Err(TransportError::UnknownTransport(event.source()));
            };

            let mut transport = transport.lock().await;
            let result = transport.when(event, &network).await;
            if let Err(err) = &result {
                warn!(transport = transport.name(), error = %err, "Transport handler failed");
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Warehouse, Warehouses};
    use tracing_test::traced_test;
    use tycoon_simulation::Simulator;
    use tycoon_test_helpers::{cargo_to, reference_map};
    use tycoon_types::{Duration, Time};

    fn fleet(sea: Duration) -> Fleet {
        let sim = Simulator::new(Time::EPOCH);
        let mut warehouses = Warehouses::new();
        for location in ["FACTORY", "PORT", "A", "B"] {
            warehouses.insert(Warehouse::new(location, sim.processes().clone()));
        }
        Fleet::new(Arc::new(Network::new(sim, reference_map(sea), warehouses)))
    }

    #[test]
    fn test_ids_are_dense_and_ordered() {
        let mut fleet = fleet(Duration::hours(4));
        let first = fleet.add("Truck 1", TransportSpec::truck());
        let second = fleet.add("Vessel", TransportSpec::vessel());

        assert_eq!((first, second), (EntityId(0), EntityId(1)));
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.name_of(second), Some("Vessel"));
        assert_eq!(fleet.kind_of(first), Some(TransportKind::Truck));
        assert_eq!(fleet.name_of(EntityId(9)), None);
    }

    #[tokio::test]
    async fn test_start_journey_requires_known_warehouse() {
        let mut fleet = fleet(Duration::hours(4));
        let truck = fleet.add("Truck 1", TransportSpec::truck());

        let err = fleet.start_journey_from(truck, "NOWHERE").await.unwrap_err();
        assert!(matches!(err, TransportError::UnknownWarehouse(_)));

        fleet.start_journey_from(truck, "FACTORY").await.unwrap();
        assert_eq!(fleet.network().sim.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_single_truck_delivers_to_b() {
        let mut fleet = fleet(Duration::hours(4));
        let truck = fleet.add("Truck 1", TransportSpec::truck());
        let network = Arc::clone(fleet.network());
        network
            .warehouses
            .require("FACTORY")
            .unwrap()
            .bring(cargo_to(0, "B"))
            .unwrap();
        fleet.start_journey_from(truck, "FACTORY").await.unwrap();

        let b = Arc::clone(network.warehouses.require("B").unwrap());
        let events = network
            .sim
            .proceed(&fleet, || b.fullness() == 1)
            .await
            .unwrap();

        let names: Vec<_> = events.iter().map(|e| e.kind().name()).collect();
        assert_eq!(names, vec!["Arrived", "CargoLoaded", "Departed", "Arrived"]);
        assert_eq!(network.sim.elapsed(), Duration::hours(5));
    }

    #[tokio::test]
    async fn test_vessel_waits_for_truck_then_sails() {
        let mut fleet = fleet(Duration::hours(4));
        let truck = fleet.add("Truck 1", TransportSpec::truck());
        let vessel = fleet.add(
            "Vessel",
            TransportSpec::vessel()
                .with_capacity(1)
                .with_load_duration(Duration::ZERO)
                .with_unload_duration(Duration::ZERO),
        );
        let network = Arc::clone(fleet.network());
        network
            .warehouses
            .require("FACTORY")
            .unwrap()
            .bring(cargo_to(0, "A"))
            .unwrap();
        fleet.start_journey_from(truck, "FACTORY").await.unwrap();
        fleet.start_journey_from(vessel, "PORT").await.unwrap();

        let a = Arc::clone(network.warehouses.require("A").unwrap());
        let events = network
            .sim
            .proceed(&fleet, || a.fullness() == 1)
            .await
            .unwrap();

        assert_eq!(network.sim.elapsed(), Duration::hours(5));
        let vessel_departure = events
            .iter()
            .find(|e| e.source() == vessel && e.kind().name() == "Departed")
            .unwrap();
        assert_eq!(vessel_departure.occurred_at(), Time::EPOCH + Duration::hours(1));
    }

    #[tokio::test]
    async fn test_network_resumes_after_waiters_are_released() {
        let mut fleet = fleet(Duration::hours(4));
        let truck = fleet.add("Truck 1", TransportSpec::truck());
        let vessel = fleet.add("Vessel", TransportSpec::vessel());
        let network = Arc::clone(fleet.network());
        let factory = Arc::clone(network.warehouses.require("FACTORY").unwrap());
        let port = Arc::clone(network.warehouses.require("PORT").unwrap());
        let b = Arc::clone(network.warehouses.require("B").unwrap());
        factory.bring(cargo_to(0, "B")).unwrap();
        fleet.start_journey_from(truck, "FACTORY").await.unwrap();
        fleet.start_journey_from(vessel, "PORT").await.unwrap();

        network.sim.proceed(&fleet, || b.delivered() == 1).await.unwrap();
        assert_eq!(network.sim.elapsed(), Duration::hours(5));
        assert_eq!(port.waiting(), 1);
        assert_eq!(network.warehouses.release_waiters(), 1);

        // The truck brings A-bound cargo to the port, where the cancelled
        // vessel used to wait.
        factory.bring(cargo_to(1, "A")).unwrap();
        network.sim.proceed(&fleet, || port.fullness() == 1).await.unwrap();
        assert_eq!(network.sim.elapsed(), Duration::hours(11));
        assert_eq!(port.cargo(), vec![cargo_to(1, "A")]);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_route_failure_aborts_run() {
        let mut fleet = fleet(Duration::hours(4));
        let vessel = fleet.add("Vessel", TransportSpec::vessel());
        let network = Arc::clone(fleet.network());
        network
            .warehouses
            .require("PORT")
            .unwrap()
            .bring(cargo_to(0, "B"))
            .unwrap();
        fleet.start_journey_from(vessel, "PORT").await.unwrap();

        let result = network.sim.proceed(&fleet, || false).await;

        assert!(matches!(result, Err(TransportError::RouteNotFound { .. })));
        assert!(logs_contain("Transport handler failed"));
    }

    #[tokio::test]
    async fn test_unknown_source_is_rejected() {
        let fleet = fleet(Duration::hours(4));
        let event = Event::new(
            EntityId(3),
            Time::EPOCH,
            TransportEvent::Arrived {
                at: "PORT".into(),
                cargo: Vec::new(),
            },
        );
        let err = fleet.dispatch(event).await.unwrap_err();
        assert!(matches!(err, TransportError::UnknownTransport(EntityId(3))));
    }
}
