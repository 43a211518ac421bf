#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Rendering for the eco-guardian dashboard.
//!
//! Everything here is a function from bins and alerts to view models in
//! [`eco_guardian_view_models`]. The only retained state is the
//! [`MarkerRegistry`] and the [`DetailChart`], both owned by the caller.

pub mod alerts;
pub mod chart;
pub mod markers;
pub mod route;
pub mod stats;

use chrono::{DateTime, Utc};
use eco_guardian_bin_models::{Alert, Bin};
use eco_guardian_view_models::StatsView;

pub use alerts::render_alerts;
pub use chart::{DetailChart, render_chart};
pub use markers::MarkerRegistry;
pub use route::plan_route;

/// Places or updates a marker for every bin.
///
/// A bin whose location doesn't parse is logged and skipped; the other
/// bins are still drawn. Returns the number of markers drawn.
pub fn render_markers<'a>(
    registry: &mut MarkerRegistry,
    bins: impl IntoIterator<Item = &'a Bin>,
) -> usize {
    let mut drawn = 0;
    for bin in bins {
        match registry.upsert(bin) {
            Ok(_) => drawn += 1,
            Err(e) => log::warn!("Skipping marker for bin #{}: {e}", bin.id),
        }
    }
    drawn
}

/// Draws every bin's marker and recomputes the header statistics.
pub fn render_all(
    registry: &mut MarkerRegistry,
    bins: &[Bin],
    alerts: &[Alert],
    now: DateTime<Utc>,
) -> StatsView {
    let drawn = render_markers(registry, bins);
    log::debug!("Rendered {drawn}/{} markers", bins.len());
    stats::summarize(bins, alerts, now)
}
