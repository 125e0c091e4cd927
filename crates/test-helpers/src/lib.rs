//! Shared fixtures for Tycoon tests.
//!
//! The reference network is the one every delivery scenario runs on:
//!
//! ```text
//! FACTORY ──land 1h── PORT ~~sea Nh~~ A
//!    │
//!  land 5h
//!    │
//!    B
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tycoon_routing::TransportMap;
use tycoon_types::{Cargo, Duration, LocationCode, TrackNumber};

pub const FACTORY: &str = "FACTORY";
pub const PORT: &str = "PORT";
pub const A: &str = "A";
pub const B: &str = "B";

/// The reference network with the given PORT-A sea crossing time.
pub fn reference_map(sea: Duration) -> TransportMap {
    let mut map = TransportMap::new();
    map.by_land(FACTORY, PORT, Duration::hours(1))
        .by_sea(PORT, A, sea)
        .by_land(FACTORY, B, Duration::hours(5));
    map
}

/// Cargo leaving the factory for `destination`.
pub fn cargo_to(track_number: u32, destination: &str) -> Cargo {
    Cargo::new(TrackNumber(track_number), FACTORY, destination)
}

/// Location codes parsed from a compact string such as `"AABABBAB"`.
pub fn destinations(codes: &str) -> Vec<LocationCode> {
    codes
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| LocationCode::new(c.to_string()))
        .collect()
}

/// A reproducible random list of `len` destinations drawn from A and B.
pub fn random_destinations(seed: u64, len: usize) -> Vec<LocationCode> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| LocationCode::new(if rng.gen_bool(0.5) { A } else { B }))
        .collect()
}
