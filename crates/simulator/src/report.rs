//! JSON-lines rendering of a delivery's event history.
//!
//! One object per dispatched event, for example:
//!
//! ```text
//! {"event":"DEPART","time":0.0,"transport_id":"Truck 1","kind":"TRUCK","location":"FACTORY","destination":"PORT","cargo":[{"cargo_id":0,"origin":"FACTORY","destination":"A"}]}
//! ```

use crate::scenario::Delivery;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;
use tycoon_core::TransportEvent;
use tycoon_simulation::Event;
use tycoon_types::{Cargo, Time};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode report record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A cargo item as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CargoRecord {
    pub cargo_id: u32,
    pub origin: String,
    pub destination: String,
}

impl From<&Cargo> for CargoRecord {
    fn from(cargo: &Cargo) -> Self {
        Self {
            cargo_id: cargo.track_number.0,
            origin: cargo.origin.to_string(),
            destination: cargo.destination.to_string(),
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub event: &'static str,
    /// Hours since the first event. Loading and unloading are stamped at
    /// the start of the phase.
    pub time: f64,
    pub transport_id: String,
    pub kind: &'static str,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub cargo: Vec<CargoRecord>,
}

impl EventRecord {
    fn new(event: &Event<TransportEvent>, start: Time, delivery: &Delivery) -> Self {
        let since_start = event.occurred_at() - start;
        let (name, time, destination, duration) = match event.kind() {
            TransportEvent::Arrived { .. } => ("ARRIVE", since_start, None, None),
            TransportEvent::Departed { to, .. } => {
                ("DEPART", since_start, Some(to.to_string()), None)
            }
            TransportEvent::CargoLoaded { duration, .. } => (
                "LOAD",
                since_start - *duration,
                None,
                Some(duration.as_hours_f64()),
            ),
            TransportEvent::CargoUnloaded { duration, .. } => (
                "UNLOAD",
                since_start - *duration,
                None,
                Some(duration.as_hours_f64()),
            ),
        };

        Self {
            event: name,
            time: time.as_hours_f64(),
            transport_id: delivery
                .transport_name(event.source())
                .map(str::to_owned)
                .unwrap_or_else(|| event.source().to_string()),
            kind: delivery
                .transport_kind(event.source())
                .map_or("UNKNOWN", |kind| kind.as_str()),
            location: event.kind().location().to_string(),
            destination,
            duration,
            cargo: event.kind().cargo().iter().map(CargoRecord::from).collect(),
        }
    }
}

/// Render every event of `delivery`, timed relative to the first one.
pub fn records(delivery: &Delivery) -> Vec<EventRecord> {
    let Some(first) = delivery.events.first() else {
        return Vec::new();
    };
    let start = first.occurred_at();
    delivery
        .events
        .iter()
        .map(|event| EventRecord::new(event, start, delivery))
        .collect()
}

/// Write the report as one JSON object per line.
pub fn write_json_lines<W: Write>(delivery: &Delivery, mut writer: W) -> Result<(), ReportError> {
    for record in records(delivery) {
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deliver, ScenarioConfig};
    use tycoon_test_helpers::destinations;

    #[tokio::test]
    async fn test_single_truck_trip_report() {
        let delivery = deliver(&ScenarioConfig::classic(), &destinations("B"))
            .await
            .unwrap();
        let records = records(&delivery);

        let truck_events: Vec<_> = records
            .iter()
            .filter(|r| r.transport_id == "Truck 1")
            .map(|r| (r.event, r.time, r.location.as_str()))
            .collect();
        assert_eq!(
            truck_events,
            vec![
                ("ARRIVE", 0.0, "FACTORY"),
                ("LOAD", 0.0, "FACTORY"),
                ("DEPART", 0.0, "FACTORY"),
                ("ARRIVE", 5.0, "B"),
            ]
        );

        let depart = records.iter().find(|r| r.event == "DEPART").unwrap();
        assert_eq!(depart.destination.as_deref(), Some("B"));
        assert_eq!(depart.kind, "TRUCK");
        assert_eq!(
            depart.cargo,
            vec![CargoRecord {
                cargo_id: 0,
                origin: "FACTORY".into(),
                destination: "B".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_load_time_marks_start_of_phase() {
        let delivery = deliver(&ScenarioConfig::vessel_handling(), &destinations("A"))
            .await
            .unwrap();
        let records = records(&delivery);

        let load = records
            .iter()
            .find(|r| r.kind == "VESSEL" && r.event == "LOAD")
            .unwrap();
        assert_eq!(load.time, 1.0);
        assert_eq!(load.duration, Some(1.0));
        assert_eq!(load.location, "PORT");
        assert_eq!(load.destination, None);
    }

    #[tokio::test]
    async fn test_json_lines_shape() {
        let delivery = deliver(&ScenarioConfig::classic(), &destinations("A"))
            .await
            .unwrap();
        let mut out = Vec::new();
        write_json_lines(&delivery, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), delivery.events.len());

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "ARRIVE");
        assert_eq!(first["transport_id"], "Truck 1");
        assert_eq!(first["time"], 0.0);
        assert!(first.get("destination").is_none());
        assert!(first.get("duration").is_none());
        assert_eq!(first["cargo"], serde_json::json!([]));
    }

    #[test]
    fn test_empty_delivery_renders_nothing() {
        let delivery = Delivery {
            events: Vec::new(),
            started_at: Time::EPOCH,
            finished_at: Time::EPOCH,
            expected: 0,
            delivered: 0,
            transports: Vec::new(),
        };
        assert!(records(&delivery).is_empty());
    }
}
