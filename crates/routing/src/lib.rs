//! Route-finding over the delivery network.
//!
//! A [`TransportMap`] is an undirected graph of warehouses whose edges are
//! [`Segment`]s tagged with a travel duration and a [`ShipmentMode`].
//! Queries return an [`Itinerary`], which transports then cut down to the
//! single-mode leg they can actually travel.
//!
//! [`ShipmentMode`]: tycoon_types::ShipmentMode

mod itinerary;
mod map;

pub use itinerary::{Itinerary, Segment};
pub use map::TransportMap;
