//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Code identifying a location (and the warehouse standing there).
///
/// Cheap to clone: the code is interned behind an `Arc`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LocationCode(Arc<str>);

impl LocationCode {
    /// Create a location code.
    pub fn new(code: impl AsRef<str>) -> Self {
        LocationCode(Arc::from(code.as_ref()))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationCode {
    fn from(code: &str) -> Self {
        LocationCode::new(code)
    }
}

impl From<String> for LocationCode {
    fn from(code: String) -> Self {
        LocationCode(Arc::from(code))
    }
}

impl From<LocationCode> for String {
    fn from(code: LocationCode) -> Self {
        code.0.to_string()
    }
}

impl AsRef<str> for LocationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LocationCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LocationCode {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for LocationCode {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Tracking number of a single cargo item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TrackNumber(pub u32);

impl TrackNumber {
    /// Get the next tracking number.
    pub fn next(self) -> Self {
        TrackNumber(self.0 + 1)
    }
}

impl fmt::Display for TrackNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a segment of the network is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentMode {
    /// Over land, by truck.
    Land,
    /// Over sea, by vessel.
    Sea,
}

impl ShipmentMode {
    /// Get a human-readable name for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentMode::Land => "land",
            ShipmentMode::Sea => "sea",
        }
    }
}

impl fmt::Display for ShipmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown shipment mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shipment mode {0:?} (expected \"land\" or \"sea\")")]
pub struct ParseShipmentModeError(pub String);

impl FromStr for ShipmentMode {
    type Err = ParseShipmentModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" => Ok(ShipmentMode::Land),
            "sea" => Ok(ShipmentMode::Sea),
            _ => Err(ParseShipmentModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_code_compares_with_str() {
        let port = LocationCode::new("Port");
        assert_eq!(port, "Port");
        assert_eq!(port.to_string(), "Port");
        assert_eq!(port, LocationCode::from(String::from("Port")));
    }

    #[test]
    fn test_location_code_serde_is_plain_string() {
        let json = serde_json::to_string(&LocationCode::new("A")).unwrap();
        assert_eq!(json, "\"A\"");
        let back: LocationCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "A");
    }

    #[test]
    fn test_shipment_mode_parse() {
        assert_eq!("land".parse::<ShipmentMode>(), Ok(ShipmentMode::Land));
        assert_eq!(" SEA ".parse::<ShipmentMode>(), Ok(ShipmentMode::Sea));
        assert!("air".parse::<ShipmentMode>().is_err());
    }
}
