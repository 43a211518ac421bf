//! Suggested collection route.

use eco_guardian_bin_models::{Alert, Bin, FillStatus};
use eco_guardian_view_models::{RouteStop, RouteView};

/// Lists critical bins, fullest first, followed by alert sites.
#[must_use]
pub fn plan_route(bins: &[Bin], alerts: &[Alert]) -> RouteView {
    let mut full: Vec<&Bin> = bins
        .iter()
        .filter(|bin| bin.status() == FillStatus::Critical)
        .collect();
    full.sort_by(|a, b| b.fill_level.total_cmp(&a.fill_level).then(a.id.cmp(&b.id)));

    let stops: Vec<RouteStop> = full
        .into_iter()
        .map(|bin| RouteStop {
            bin_id: bin.id,
            name: bin.display_name(),
            location: bin.location.clone(),
            fill_level: bin.fill_level,
        })
        .collect();

    let alert_locations: Vec<String> = alerts.iter().map(|a| a.location.clone()).collect();

    let summary = format!(
        "Start → {} full bins → {} alerts",
        stops.len(),
        alert_locations.len()
    );

    RouteView {
        stops,
        alert_locations,
        summary,
    }
}
