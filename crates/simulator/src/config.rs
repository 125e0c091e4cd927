//! Scenario configuration.
//!
//! A scenario describes the network (warehouses and links), where cargo
//! starts, where it may be delivered, and the transports serving it. The
//! three presets reproduce the reference network; anything else can be
//! loaded from TOML:
//!
//! ```toml
//! warehouses = ["FACTORY", "PORT", "A", "B"]
//! origin = "FACTORY"
//! delivery_points = ["A", "B"]
//!
//! [[links]]
//! from = "FACTORY"
//! to = "PORT"
//! hours = 1.0
//! mode = "land"
//!
//! [[transports]]
//! name = "Vessel"
//! kind = "vessel"
//! start = "PORT"
//! capacity = 4
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tycoon_core::{TransportKind, TransportSpec};
use tycoon_routing::TransportMap;
use tycoon_types::{Duration, LocationCode, ShipmentMode};

/// Errors found while loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read scenario file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed scenario file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown location codes: {}", join(.0))]
    UnknownLocations(Vec<LocationCode>),

    #[error("{location} is not a warehouse ({context})")]
    NotAWarehouse {
        location: LocationCode,
        context: &'static str,
    },

    #[error("No route from {from} to {to}")]
    Unreachable { from: LocationCode, to: LocationCode },

    #[error("Transport {transport} must carry at least one item")]
    ZeroCapacity { transport: String },

    #[error("Transport {transport} has an invalid {what}: {hours}h")]
    InvalidHours {
        transport: String,
        what: &'static str,
        hours: f64,
    },

    #[error("Link {from}-{to} has an invalid travel time: {hours}h")]
    InvalidLink {
        from: LocationCode,
        to: LocationCode,
        hours: f64,
    },
}

/// Longest travel or handling time a scenario may ask for, about a century.
/// Keeps every reachable point of a run inside the simulated timeline.
pub const MAX_HOURS: f64 = 1_000_000.0;

fn is_valid_hours(hours: f64) -> bool {
    hours.is_finite() && (0.0..=MAX_HOURS).contains(&hours)
}

fn join(codes: &[LocationCode]) -> String {
    codes
        .iter()
        .map(LocationCode::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// A bidirectional link of the network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    pub from: LocationCode,
    pub to: LocationCode,
    /// Travel time in hours.
    pub hours: f64,
    pub mode: ShipmentMode,
}

impl LinkConfig {
    pub fn new(
        from: impl Into<LocationCode>,
        to: impl Into<LocationCode>,
        hours: f64,
        mode: ShipmentMode,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            hours,
            mode,
        }
    }
}

/// A transport and the warehouse it starts at.
///
/// Unset fields fall back to the [`TransportSpec`] preset of its kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    pub name: String,
    pub kind: TransportKind,
    pub start: LocationCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ShipmentMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unload_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depart_after_hours: Option<f64>,
}

impl TransportConfig {
    fn new(name: impl Into<String>, kind: TransportKind, start: impl Into<LocationCode>) -> Self {
        Self {
            name: name.into(),
            kind,
            start: start.into(),
            mode: None,
            capacity: None,
            load_hours: None,
            unload_hours: None,
            depart_after_hours: None,
        }
    }

    /// A truck with the default truck characteristics.
    pub fn truck(name: impl Into<String>, start: impl Into<LocationCode>) -> Self {
        Self::new(name, TransportKind::Truck, start)
    }

    /// A vessel with the default vessel characteristics.
    pub fn vessel(name: impl Into<String>, start: impl Into<LocationCode>) -> Self {
        Self::new(name, TransportKind::Vessel, start)
    }

    pub fn with_mode(mut self, mode: ShipmentMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_load_hours(mut self, hours: f64) -> Self {
        self.load_hours = Some(hours);
        self
    }

    pub fn with_unload_hours(mut self, hours: f64) -> Self {
        self.unload_hours = Some(hours);
        self
    }

    pub fn with_depart_after_hours(mut self, hours: f64) -> Self {
        self.depart_after_hours = Some(hours);
        self
    }

    /// Resolve into a transport spec, validating every field.
    pub fn spec(&self) -> Result<TransportSpec, ConfigError> {
        let mut spec = match self.kind {
            TransportKind::Truck => TransportSpec::truck(),
            TransportKind::Vessel => TransportSpec::vessel(),
        };
        if let Some(mode) = self.mode {
            spec.mode = mode;
        }
        if let Some(capacity) = self.capacity {
            spec = spec.with_capacity(capacity);
        }
        if spec.capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                transport: self.name.clone(),
            });
        }
        if let Some(hours) = self.load_hours {
            spec = spec.with_load_duration(self.hours("load time", hours)?);
        }
        if let Some(hours) = self.unload_hours {
            spec = spec.with_unload_duration(self.hours("unload time", hours)?);
        }
        if let Some(hours) = self.depart_after_hours {
            spec = spec.with_depart_after(self.hours("departure delay", hours)?);
        }
        Ok(spec)
    }

    fn hours(&self, what: &'static str, hours: f64) -> Result<Duration, ConfigError> {
        if !is_valid_hours(hours) {
            return Err(ConfigError::InvalidHours {
                transport: self.name.clone(),
                what,
                hours,
            });
        }
        Ok(Duration::from_hours_f64(hours))
    }
}

/// Configuration for a delivery run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Every warehouse in the network.
    pub warehouses: Vec<LocationCode>,

    /// Warehouse all cargo starts at.
    pub origin: LocationCode,

    /// Warehouses cargo may be addressed to.
    pub delivery_points: Vec<LocationCode>,

    #[serde(default)]
    pub links: Vec<LinkConfig>,

    /// Transports, in the order their first arrivals are scheduled.
    #[serde(default)]
    pub transports: Vec<TransportConfig>,
}

impl ScenarioConfig {
    /// An empty scenario with cargo starting at `origin`.
    pub fn new(origin: impl Into<LocationCode>) -> Self {
        let origin = origin.into();
        Self {
            warehouses: vec![origin.clone()],
            origin,
            delivery_points: Vec::new(),
            links: Vec::new(),
            transports: Vec::new(),
        }
    }

    /// The reference network with two trucks and a single-slot vessel
    /// that needs no time to load or unload.
    pub fn classic() -> Self {
        Self::reference(4.0).with_transports(vec![
            TransportConfig::truck("Truck 1", "FACTORY"),
            TransportConfig::truck("Truck 2", "FACTORY"),
            TransportConfig::vessel("Vessel", "PORT")
                .with_capacity(1)
                .with_load_hours(0.0)
                .with_unload_hours(0.0),
        ])
    }

    /// Like [`classic`](Self::classic), but the vessel carries four items.
    pub fn bulk_vessel() -> Self {
        Self::reference(4.0).with_transports(vec![
            TransportConfig::truck("Truck 1", "FACTORY"),
            TransportConfig::truck("Truck 2", "FACTORY"),
            TransportConfig::vessel("Vessel", "PORT")
                .with_load_hours(0.0)
                .with_unload_hours(0.0),
        ])
    }

    /// A six-hour crossing with a four-slot vessel taking an hour to load
    /// and an hour to unload.
    pub fn vessel_handling() -> Self {
        Self::reference(6.0).with_transports(vec![
            TransportConfig::truck("Truck 1", "FACTORY"),
            TransportConfig::truck("Truck 2", "FACTORY"),
            TransportConfig::vessel("Vessel", "PORT"),
        ])
    }

    fn reference(sea_hours: f64) -> Self {
        Self::new("FACTORY")
            .with_warehouses(["PORT", "A", "B"])
            .with_delivery_points(["A", "B"])
            .with_link(LinkConfig::new("FACTORY", "PORT", 1.0, ShipmentMode::Land))
            .with_link(LinkConfig::new("PORT", "A", sea_hours, ShipmentMode::Sea))
            .with_link(LinkConfig::new("FACTORY", "B", 5.0, ShipmentMode::Land))
    }

    /// Add warehouses, skipping ones already present.
    pub fn with_warehouses<I, L>(mut self, warehouses: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LocationCode>,
    {
        for warehouse in warehouses {
            let warehouse = warehouse.into();
            if !self.warehouses.contains(&warehouse) {
                self.warehouses.push(warehouse);
            }
        }
        self
    }

    /// Set the warehouses cargo may be addressed to.
    pub fn with_delivery_points<I, L>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LocationCode>,
    {
        self.delivery_points = points.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transports.push(transport);
        self
    }

    pub fn with_transports(mut self, transports: Vec<TransportConfig>) -> Self {
        self.transports = transports;
        self
    }

    /// Parse a scenario from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(Into::into)
    }

    /// Load a scenario from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Build the transport map described by the links.
    pub fn transport_map(&self) -> TransportMap {
        let mut map = TransportMap::new();
        for link in &self.links {
            map.link(
                link.from.clone(),
                link.to.clone(),
                Duration::from_hours_f64(link.hours),
                link.mode,
            );
        }
        map
    }

    /// Check the scenario is internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let known: HashSet<&LocationCode> = self.warehouses.iter().collect();
        let require = |location: &LocationCode, context: &'static str| {
            if known.contains(location) {
                Ok(())
            } else {
                Err(ConfigError::NotAWarehouse {
                    location: location.clone(),
                    context,
                })
            }
        };

        require(&self.origin, "cargo origin")?;
        for point in &self.delivery_points {
            require(point, "delivery point")?;
        }
        for link in &self.links {
            require(&link.from, "link endpoint")?;
            require(&link.to, "link endpoint")?;
            if !is_valid_hours(link.hours) {
                return Err(ConfigError::InvalidLink {
                    from: link.from.clone(),
                    to: link.to.clone(),
                    hours: link.hours,
                });
            }
        }
        for transport in &self.transports {
            require(&transport.start, "transport start")?;
            transport.spec()?;
        }
        Ok(())
    }

    /// Check every destination is a delivery point reachable from the origin.
    ///
    /// Cargo addressed to the origin itself has no route and is rejected.
    pub fn validate_destinations(&self, destinations: &[LocationCode]) -> Result<(), ConfigError> {
        let mut unknown: Vec<LocationCode> = Vec::new();
        for destination in destinations {
            if !self.delivery_points.contains(destination) && !unknown.contains(destination) {
                unknown.push(destination.clone());
            }
        }
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownLocations(unknown));
        }

        let map = self.transport_map();
        for point in &self.delivery_points {
            if !destinations.contains(point) {
                continue;
            }
            if map.find_itinerary(self.origin.as_str(), point.as_str()).is_empty() {
                return Err(ConfigError::Unreachable {
                    from: self.origin.clone(),
                    to: point.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::classic()
    }
}
