#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Synthetic bin data for the eco-guardian dashboard.
//!
//! Only one bin in the fleet has a real sensor. To make the map look like
//! a city-wide deployment, the dashboard pads the fleet with eight
//! simulated bins at fixed spots and nudges their fill levels over time.
//!
//! The random source is always passed in, so callers can seed it.

pub mod roster;

use eco_guardian_bin_models::{Bin, BinId, REAL_BIN_ID, clamp_fill_level};
use rand::Rng;

/// Step applied to an existing simulated bin on every regeneration.
pub const REGENERATE_STEP: f64 = 5.0;

/// Largest change a single drift tick applies, in either direction.
pub const MAX_DRIFT: f64 = 10.0;

/// Adds `step` to `level` and clamps the result into `[0, 100]`.
#[must_use]
pub fn perturb(level: f64, step: f64) -> f64 {
    clamp_fill_level(level + step)
}

/// Rebuilds the bin collection from the real bin plus the simulated
/// roster.
///
/// The result holds the real bin (ID 1) untouched if `current` has it,
/// followed by one bin per roster entry. A roster bin that already exists
/// in `current` keeps its data and moves 5 points up or down; a missing
/// one is created with a uniformly random fill level. Any other bins in
/// `current` are dropped.
pub fn regenerate<R: Rng + ?Sized>(current: &[Bin], rng: &mut R) -> Vec<Bin> {
    let locations = roster::locations();
    let mut bins = Vec::with_capacity(locations.len() + 1);

    if let Some(real) = current.iter().find(|bin| bin.id == REAL_BIN_ID) {
        bins.push(real.clone());
    }

    for location in locations {
        let bin = match current.iter().find(|bin| bin.id == location.id) {
            Some(existing) => {
                let step = if rng.gen_bool(0.5) {
                    REGENERATE_STEP
                } else {
                    -REGENERATE_STEP
                };
                let mut bin = existing.clone();
                bin.fill_level = perturb(bin.fill_level, step);
                bin
            }
            None => {
                let fill_level = f64::from(rng.gen_range(0_u8..=100));
                log::debug!(
                    "Created simulated bin #{} ({}) at {fill_level}%",
                    location.id,
                    location.name
                );
                location.bin_with_fill(fill_level)
            }
        };
        bins.push(bin);
    }

    bins
}

/// Moves one randomly chosen simulated bin by up to 10 points.
///
/// The real bin is never touched. Returns the ID of the bin that changed,
/// or `None` if `bins` holds no simulated bins.
pub fn drift<R: Rng + ?Sized>(bins: &mut [Bin], rng: &mut R) -> Option<BinId> {
    let simulated: Vec<usize> = bins
        .iter()
        .enumerate()
        .filter(|(_, bin)| bin.is_simulated())
        .map(|(idx, _)| idx)
        .collect();

    if simulated.is_empty() {
        return None;
    }

    let target = &mut bins[simulated[rng.gen_range(0..simulated.len())]];
    let change = rng.gen_range(-MAX_DRIFT..=MAX_DRIFT);
    target.fill_level = perturb(target.fill_level, change);

    log::debug!(
        "Drifted simulated bin #{} by {change:+.1} to {:.1}%",
        target.id,
        target.fill_level
    );

    Some(target.id)
}
