//! Shared view of the world every transport handler runs against.

use crate::{TransportEvent, Warehouses};
use tycoon_routing::TransportMap;
use tycoon_simulation::Simulator;

/// The engine, the map and the warehouses of one delivery run.
///
/// Handlers only read the map and look warehouses up by location code;
/// warehouse stock is mutated through the warehouses' own operations.
#[derive(Debug)]
pub struct Network {
    pub sim: Simulator<TransportEvent>,
    pub map: TransportMap,
    pub warehouses: Warehouses,
}

impl Network {
    pub fn new(sim: Simulator<TransportEvent>, map: TransportMap, warehouses: Warehouses) -> Self {
        Self {
            sim,
            map,
            warehouses,
        }
    }
}
