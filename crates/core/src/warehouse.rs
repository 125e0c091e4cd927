//! Warehouses and their blocking cargo queues.

use crate::TransportError;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;
use tycoon_simulation::{ProcessScheduler, SchedulerError, Signal};
use tycoon_types::{Cargo, LocationCode};

#[derive(Debug, Default)]
struct Stock {
    cargo: VecDeque<Cargo>,
    waiters: VecDeque<Signal>,
}

/// A FIFO cargo buffer standing at a location.
///
/// Consumers that find it empty can park with [`Warehouse::wait_for_cargo`];
/// every [`Warehouse::bring`] wakes the oldest parked consumer, one per
/// cargo item. Cargo addressed to this location is delivered: it stays put
/// and is never handed out again.
#[derive(Debug)]
pub struct Warehouse {
    location: LocationCode,
    processes: ProcessScheduler,
    stock: Mutex<Stock>,
}

impl Warehouse {
    pub fn new(location: impl Into<LocationCode>, processes: ProcessScheduler) -> Self {
        Self {
            location: location.into(),
            processes,
            stock: Mutex::new(Stock::default()),
        }
    }

    pub fn location_code(&self) -> &LocationCode {
        &self.location
    }

    fn is_delivered(&self, cargo: &Cargo) -> bool {
        cargo.destination == self.location
    }

    /// Take the oldest cargo item still on its way, if there is one.
    pub fn pick_cargo(&self) -> Option<Cargo> {
        let mut stock = self.stock.lock();
        let index = stock
            .cargo
            .iter()
            .position(|cargo| !self.is_delivered(cargo))?;
        stock.cargo.remove(index)
    }

    /// Park the calling process until cargo is available.
    ///
    /// Returns at once if the warehouse already holds cargo. Otherwise the
    /// process is suspended and resumed by the `bring` that pairs with it.
    /// Callers still have to [`pick_cargo`](Self::pick_cargo) afterwards.
    pub async fn wait_for_cargo(&self) -> Result<(), SchedulerError> {
        let waiter = {
            let mut stock = self.stock.lock();
            if stock.cargo.iter().any(|cargo| !self.is_delivered(cargo)) {
                return Ok(());
            }
            let (signal, waiter) = self.processes.park()?;
            stock.waiters.push_back(signal);
            waiter
        };

        trace!(warehouse = %self.location, "Waiting for cargo");
        waiter.wait().await
    }

    /// Store `cargo`, waking the longest-waiting consumer if it still has
    /// somewhere to go.
    pub fn bring(&self, cargo: Cargo) -> Result<(), SchedulerError> {
        let waiter = {
            let mut stock = self.stock.lock();
            let delivered = self.is_delivered(&cargo);
            trace!(warehouse = %self.location, %cargo, delivered, "Cargo brought");
            stock.cargo.push_back(cargo);
            if delivered {
                None
            } else {
                stock.waiters.pop_front()
            }
        };

        match waiter {
            Some(signal) => signal.fire(),
            None => Ok(()),
        }
    }

    /// Number of cargo items currently stored.
    pub fn fullness(&self) -> usize {
        self.stock.lock().cargo.len()
    }

    /// Number of stored items addressed to this location.
    pub fn delivered(&self) -> usize {
        self.stock
            .lock()
            .cargo
            .iter()
            .filter(|cargo| self.is_delivered(cargo))
            .count()
    }

    /// Number of consumers parked on this warehouse.
    pub fn waiting(&self) -> usize {
        self.stock.lock().waiters.len()
    }

    /// Forget every parked consumer without waking it. Returns how many
    /// were dropped.
    ///
    /// Used once a run has stopped and its parked processes are gone.
    pub fn release_waiters(&self) -> usize {
        let mut stock = self.stock.lock();
        let released = stock.waiters.len();
        stock.waiters.clear();
        released
    }

    /// The stored cargo, oldest first.
    pub fn cargo(&self) -> Vec<Cargo> {
        self.stock.lock().cargo.iter().cloned().collect()
    }
}

/// Every warehouse in the network, keyed by location code.
#[derive(Debug, Clone, Default)]
pub struct Warehouses {
    by_location: IndexMap<LocationCode, Arc<Warehouse>>,
}

impl Warehouses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a warehouse, replacing any other at the same location.
    pub fn insert(&mut self, warehouse: Warehouse) -> Arc<Warehouse> {
        let warehouse = Arc::new(warehouse);
        self.by_location
            .insert(warehouse.location_code().clone(), Arc::clone(&warehouse));
        warehouse
    }

    pub fn get(&self, location: &str) -> Option<&Arc<Warehouse>> {
        self.by_location.get(location)
    }

    /// Look up a warehouse that must exist.
    pub fn require(&self, location: &str) -> Result<&Arc<Warehouse>, TransportError> {
        self.get(location)
            .ok_or_else(|| TransportError::UnknownWarehouse(LocationCode::new(location)))
    }

    pub fn contains(&self, location: &str) -> bool {
        self.by_location.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Warehouse>> {
        self.by_location.values()
    }

    /// Cargo delivered across the given locations. Unknown locations count
    /// as empty.
    pub fn delivered_to<'a>(&self, locations: impl IntoIterator<Item = &'a LocationCode>) -> usize {
        locations
            .into_iter()
            .filter_map(|location| self.get(location.as_str()))
            .map(|warehouse| warehouse.delivered())
            .sum()
    }

    /// Drop parked consumers everywhere. Returns how many were dropped.
    pub fn release_waiters(&self) -> usize {
        self.iter().map(|warehouse| warehouse.release_waiters()).sum()
    }
}
