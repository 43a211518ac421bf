//! Compile-time roster of simulated bin locations.
//!
//! The roster lives in `locations.toml` at the crate root and is
//! embedded at compile time.

use std::sync::LazyLock;

use eco_guardian_bin_models::{Bin, BinId};
use serde::Deserialize;

/// A fixed spot where a simulated bin is placed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulatedLocation {
    /// Bin ID assigned to this spot. Always greater than 1.
    pub id: BinId,
    /// `"lat,lng"` location string.
    pub location: String,
    /// Human-readable name of the spot.
    pub name: String,
}

impl SimulatedLocation {
    /// Builds a fresh bin at this spot with the given fill level.
    #[must_use]
    pub fn bin_with_fill(&self, fill_level: f64) -> Bin {
        Bin {
            id: self.id,
            fill_level,
            location: self.location.clone(),
            name: Some(self.name.clone()),
            last_updated: None,
        }
    }
}

#[derive(Deserialize)]
struct RosterFile {
    location: Vec<SimulatedLocation>,
}

const ROSTER_TOML: &str = include_str!("../locations.toml");

static ROSTER: LazyLock<Vec<SimulatedLocation>> = LazyLock::new(|| {
    let file: RosterFile = toml::de::from_str(ROSTER_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse simulated bin roster: {e}"));
    file.location
});

/// Returns every simulated location, in roster order.
///
/// # Panics
///
/// Panics if the embedded roster is malformed (this is a compile-time
/// guarantee since the roster is embedded).
#[must_use]
pub fn locations() -> &'static [SimulatedLocation] {
    &ROSTER
}
