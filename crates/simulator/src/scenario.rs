//! The delivery driver.

use crate::config::{ConfigError, ScenarioConfig};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use tycoon_core::{Fleet, Network, TransportError, TransportEvent, TransportKind, Warehouse, Warehouses};
use tycoon_simulation::{EntityId, Event, Simulator};
use tycoon_types::{Cargo, Duration, LocationCode, Time, TrackNumber};

/// Errors from building or running a delivery.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The outcome of a delivery run.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Every dispatched event, in dispatch order.
    pub events: Vec<Event<TransportEvent>>,
    pub started_at: Time,
    pub finished_at: Time,
    /// Cargo items scheduled for delivery.
    pub expected: usize,
    /// Cargo items sitting at their own delivery point when the run stopped.
    pub delivered: usize,
    /// Name and kind of every transport, indexed by [`EntityId`].
    pub transports: Vec<(String, TransportKind)>,
}

impl Delivery {
    /// Simulated time the delivery took.
    pub fn elapsed(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// Check if every scheduled item reached its delivery point.
    pub fn is_complete(&self) -> bool {
        self.delivered >= self.expected
    }

    pub fn transport_name(&self, id: EntityId) -> Option<&str> {
        self.transports.get(id.index()).map(|(name, _)| name.as_str())
    }

    pub fn transport_kind(&self, id: EntityId) -> Option<TransportKind> {
        self.transports.get(id.index()).map(|(_, kind)| *kind)
    }
}

/// A validated, ready-to-run delivery.
#[derive(Debug)]
pub struct Simulation {
    fleet: Fleet,
    starts: Vec<(EntityId, LocationCode)>,
    delivery_points: Vec<LocationCode>,
    expected: usize,
}

impl Simulation {
    /// Validate `config` against `destinations` and build the network.
    ///
    /// One cargo item per destination is placed at the origin warehouse,
    /// numbered in order from zero.
    pub fn new(config: &ScenarioConfig, destinations: &[LocationCode]) -> Result<Self, ScenarioError> {
        config.validate()?;
        config.validate_destinations(destinations)?;

        let sim = Simulator::new(Time::EPOCH);
        let mut warehouses = Warehouses::new();
        for location in &config.warehouses {
            warehouses.insert(Warehouse::new(location.clone(), sim.processes().clone()));
        }

        let origin = warehouses.require(config.origin.as_str())?;
        let mut track_number = TrackNumber(0);
        for destination in destinations {
            let cargo = Cargo::new(track_number, config.origin.clone(), destination.clone());
            origin.bring(cargo).map_err(TransportError::from)?;
            track_number = track_number.next();
        }

        let network = Network::new(sim, config.transport_map(), warehouses);
        let mut fleet = Fleet::new(Arc::new(network));
        let mut starts = Vec::with_capacity(config.transports.len());
        for transport in &config.transports {
            let id = fleet.add(transport.name.clone(), transport.spec()?);
            starts.push((id, transport.start.clone()));
        }

        Ok(Self {
            fleet,
            starts,
            delivery_points: config.delivery_points.clone(),
            expected: destinations.len(),
        })
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Run until every cargo item sits at its own delivery point, or until nothing
    /// is left to happen.
    pub async fn run(self) -> Result<Delivery, ScenarioError> {
        for (id, start) in &self.starts {
            self.fleet.start_journey_from(*id, start.as_str()).await?;
        }

        let network = self.fleet.network();
        let sim = &network.sim;
        let delivered = || network.warehouses.delivered_to(&self.delivery_points);
        info!(
            cargo = self.expected,
            transports = self.fleet.len(),
            "Starting delivery"
        );

        let outcome = sim.proceed(&self.fleet, || delivered() >= self.expected).await;
        let released = network.warehouses.release_waiters();
        if released > 0 {
            debug!(released, "Released transports still waiting for cargo");
        }
        let events = match outcome {
            Ok(events) => events,
            Err(err) => {
                warn!(at = %sim.now(), error = %err, "Delivery aborted");
                return Err(err.into());
            }
        };

        let delivery = Delivery {
            events,
            started_at: sim.started_at(),
            finished_at: sim.now(),
            expected: self.expected,
            delivered: delivered(),
            transports: self.fleet.roster().to_vec(),
        };
        if delivery.is_complete() {
            info!(elapsed = %delivery.elapsed(), events = delivery.events.len(), "Delivery complete");
        } else {
            warn!(
                delivered = delivery.delivered,
                expected = delivery.expected,
                "Delivery stalled before every item arrived"
            );
        }
        Ok(delivery)
    }
}

/// Build and run a delivery in one go.
pub async fn deliver(
    config: &ScenarioConfig,
    destinations: &[LocationCode],
) -> Result<Delivery, ScenarioError> {
    Simulation::new(config, destinations)?.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LinkConfig, TransportConfig};
    use tracing_test::traced_test;
    use tycoon_types::ShipmentMode;
    use tycoon_test_helpers::destinations;

    async fn hours(config: &ScenarioConfig, codes: &str) -> Duration {
        let delivery = deliver(config, &destinations(codes)).await.unwrap();
        assert!(delivery.is_complete());
        delivery.elapsed()
    }

    #[tokio::test]
    async fn test_classic_oracles() {
        let classic = ScenarioConfig::classic();
        assert_eq!(hours(&classic, "A").await, Duration::hours(5));
        assert_eq!(hours(&classic, "AB").await, Duration::hours(5));
        assert_eq!(hours(&classic, "BB").await, Duration::hours(5));
        assert_eq!(hours(&classic, "ABB").await, Duration::hours(7));
        assert_eq!(hours(&classic, "AABABBAB").await, Duration::hours(29));
        assert_eq!(hours(&classic, "ABBBABAAABBB").await, Duration::hours(41));
    }

    #[tokio::test]
    async fn test_bulk_vessel_oracles() {
        let bulk = ScenarioConfig::bulk_vessel();
        assert_eq!(hours(&bulk, "A").await, Duration::hours(5));
        assert_eq!(hours(&bulk, "AB").await, Duration::hours(5));
        assert_eq!(hours(&bulk, "BB").await, Duration::hours(5));
        assert_eq!(hours(&bulk, "ABB").await, Duration::hours(7));
        assert_eq!(hours(&bulk, "AABABBAB").await, Duration::hours(21));
        assert_eq!(hours(&bulk, "ABBBABAAABBB").await, Duration::hours(39));
    }

    #[tokio::test]
    async fn test_vessel_handling_oracles() {
        let handling = ScenarioConfig::vessel_handling();
        assert_eq!(hours(&handling, "A").await, Duration::hours(8));
        assert_eq!(hours(&handling, "BB").await, Duration::hours(5));
        assert_eq!(hours(&handling, "ABB").await, Duration::hours(8));
        assert_eq!(hours(&handling, "AABABBAB").await, Duration::hours(36));
        assert_eq!(hours(&handling, "ABBBABAAABBB").await, Duration::hours(39));
    }

    #[tokio::test]
    async fn test_nothing_to_deliver_finishes_at_once() {
        let delivery = deliver(&ScenarioConfig::classic(), &[]).await.unwrap();
        assert!(delivery.events.is_empty());
        assert_eq!(delivery.elapsed(), Duration::ZERO);
        assert!(delivery.is_complete());
    }

    #[test]
    fn test_unknown_destination_never_builds() {
        let err = Simulation::new(&ScenarioConfig::classic(), &destinations("AXB")).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Config(ConfigError::UnknownLocations(ref unknown)) if unknown == &destinations("X")
        ));
    }

    #[tokio::test]
    async fn test_first_arrivals_follow_transport_order() {
        let delivery = deliver(&ScenarioConfig::classic(), &destinations("A")).await.unwrap();

        let first: Vec<_> = delivery
            .events
            .iter()
            .take(3)
            .map(|e| (delivery.transport_name(e.source()).unwrap(), e.kind().location().as_str()))
            .collect();
        assert_eq!(
            first,
            vec![("Truck 1", "FACTORY"), ("Truck 2", "FACTORY"), ("Vessel", "PORT")]
        );
    }

    #[tokio::test]
    async fn test_cargo_passing_through_a_delivery_point_is_not_delivered() {
        // C hangs off delivery point A by land, so C-bound cargo waits at A
        // for the only truck serving that leg.
        let config = ScenarioConfig::classic()
            .with_warehouses(["C"])
            .with_delivery_points(["A", "B", "C"])
            .with_link(LinkConfig::new("A", "C", 10.0, ShipmentMode::Land))
            .with_transport(TransportConfig::truck("Truck 3", "A"));

        let delivery = deliver(&config, &destinations("CC")).await.unwrap();

        assert!(delivery.is_complete());
        assert_eq!(delivery.delivered, 2);
        assert_eq!(delivery.elapsed(), Duration::hours(35));
        let arrivals_at_c = delivery
            .events
            .iter()
            .filter(|e| e.kind().name() == "Arrived" && e.kind().location() == "C")
            .count();
        assert_eq!(arrivals_at_c, 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_missing_route_for_mode_aborts() {
        let config = ScenarioConfig::classic()
            .with_warehouses(["C"])
            .with_delivery_points(["A", "B", "C"])
            .with_link(LinkConfig::new("FACTORY", "C", 2.0, ShipmentMode::Sea));

        let err = deliver(&config, &destinations("C")).await.unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Transport(TransportError::RouteNotFound { .. })
        ));
        assert!(logs_contain("Delivery aborted"));
    }
}
