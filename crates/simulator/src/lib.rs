//! Tycoon delivery simulator.
//!
//! Wires a scenario (network, warehouses, transports) onto the simulation
//! engine, runs it until every cargo item has been delivered, and renders
//! the resulting event history.
//!
//! # Architecture
//!
//! - **Configuration**: [`ScenarioConfig`] presets or TOML scenario files
//! - **Driver**: [`Simulation`] validates a scenario and runs the delivery
//! - **Reporting**: [`report`] turns a [`Delivery`] into JSON lines
//!
//! # Example
//!
//! ```ignore
//! use tycoon_simulator::{deliver, ScenarioConfig};
//! use tycoon_types::LocationCode;
//!
//! let destinations: Vec<LocationCode> = ["A", "B", "B"].map(LocationCode::new).into();
//! let delivery = deliver(&ScenarioConfig::classic(), &destinations).await?;
//!
//! println!("Delivered in {}", delivery.elapsed());
//! ```

pub mod config;
pub mod report;
pub mod scenario;

pub use config::{ConfigError, LinkConfig, ScenarioConfig, TransportConfig};
pub use report::{records, write_json_lines, CargoRecord, EventRecord, ReportError};
pub use scenario::{deliver, Delivery, ScenarioError, Simulation};
