//! Header statistics.

use chrono::{DateTime, Utc};
use eco_guardian_bin_models::{Alert, Bin, FillStatus};
use eco_guardian_view_models::{StatsView, StatusCounts};

/// Counts bins per fill-level band.
#[must_use]
pub fn count_statuses(bins: &[Bin]) -> StatusCounts {
    bins.iter()
        .fold(StatusCounts::default(), |mut counts, bin| {
            match bin.status() {
                FillStatus::Normal => counts.normal += 1,
                FillStatus::Warning => counts.warning += 1,
                FillStatus::Critical => counts.critical += 1,
            }
            counts
        })
}

/// Mean fill level, 0 for an empty fleet.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_fill_level(bins: &[Bin]) -> f64 {
    if bins.is_empty() {
        return 0.0;
    }
    bins.iter().map(|bin| bin.fill_level).sum::<f64>() / bins.len() as f64
}

/// The "CO2 saved" percentage.
///
/// Two points per bin, one and a half per alert, and 0.3 per point of
/// average fill, rounded down and capped at 100.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn co2_saved(total_bins: usize, total_alerts: usize, average_fill: f64) -> u8 {
    let raw = (total_bins as f64).mul_add(2.0, total_alerts as f64 * 1.5) + average_fill * 0.3;
    if raw.is_nan() {
        return 0;
    }
    raw.floor().clamp(0.0, 100.0) as u8
}

/// Recomputes every header statistic.
#[must_use]
pub fn summarize(bins: &[Bin], alerts: &[Alert], now: DateTime<Utc>) -> StatsView {
    let average = average_fill_level(bins);
    StatsView {
        total_bins: bins.len(),
        total_alerts: alerts.len(),
        average_fill_level: average,
        co2_saved: co2_saved(bins.len(), alerts.len(), average),
        status_counts: count_statuses(bins),
        last_update: now,
    }
}
