#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Serializable view models for the eco-guardian dashboard.
//!
//! A [`DashboardView`] is a complete snapshot of everything the dashboard
//! shows: map markers, summary statistics, the alert sidebar, the detail
//! chart, and the connectivity label. The browser shell renders it as-is;
//! it never needs to look at raw bins or alerts.
//!
//! These types are serialized as camelCase JSON for the view server.

use chrono::{DateTime, Utc};
use eco_guardian_bin_models::{BinId, FillStatus};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Connectivity to the backend, as last observed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionStatus {
    /// No fetch has completed yet.
    #[default]
    Connecting,
    /// The last fetch succeeded.
    Connected,
    /// The last fetch failed; simulated data is shown instead.
    Disconnected,
}

impl ConnectionStatus {
    /// Label shown in the status indicator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// Info popup attached to a map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    /// Bin display name.
    pub title: String,
    /// Fill level line, e.g. `"45%"`.
    pub fill_text: String,
    /// Status line, e.g. `"Getting Full"`.
    pub status_text: String,
    /// Label of the button that selects the bin.
    pub action_label: String,
}

/// A bin's marker on the map. Every field is derived from the bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Bin this marker belongs to.
    pub bin_id: BinId,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Fill level the icon was drawn for.
    pub fill_level: f64,
    /// Fill-level classification.
    pub status: FillStatus,
    /// Icon color as a CSS hex string.
    pub color: String,
    /// Text inside the icon, e.g. `"45%"`.
    pub icon_text: String,
    /// Popup contents.
    pub popup: Popup,
}

/// Number of bins in each fill-level band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    /// Bins at or below 60%.
    pub normal: usize,
    /// Bins above 60% and at or below 80%.
    pub warning: usize,
    /// Bins above 80%.
    pub critical: usize,
}

/// Summary statistics shown in the header cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    /// Number of bins in the active collection.
    pub total_bins: usize,
    /// Number of active alerts.
    pub total_alerts: usize,
    /// Mean fill level across all bins, 0 for an empty fleet.
    pub average_fill_level: f64,
    /// "CO2 saved" percentage, capped at 100.
    pub co2_saved: u8,
    /// Per-band bin counts.
    pub status_counts: StatusCounts,
    /// When the stats were last recomputed.
    pub last_update: DateTime<Utc>,
}

/// Action affordance offered on each alert list entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertAction {
    /// Open the alert's details.
    View,
    /// Mark the alert as resolved.
    Resolve,
}

/// One entry in the alert sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertItem {
    /// Alert ID.
    pub id: i64,
    /// Wire name of the alert type.
    pub alert_type: String,
    /// Human-readable type label.
    pub type_label: String,
    /// Where it happened.
    pub location: String,
    /// Formatted timestamp.
    pub time_text: String,
    /// Actions offered for this entry.
    pub actions: Vec<AlertAction>,
}

/// The alert sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertList {
    /// Entries, in the order the backend sent them.
    pub items: Vec<AlertItem>,
    /// Text shown instead of entries when there are none.
    pub placeholder: Option<String>,
}

/// The doughnut chart for the selected bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    /// Bin the chart describes.
    pub bin_id: BinId,
    /// Title above the chart.
    pub title: String,
    /// Segment labels: used, remaining.
    pub labels: [String; 2],
    /// Segment values: fill level, remaining capacity.
    pub data: [f64; 2],
    /// Segment colors.
    pub colors: [String; 2],
    /// Size of the doughnut hole, in percent.
    pub cutout_percent: u8,
    /// Incremented every time the chart is torn down and rebuilt.
    pub revision: u64,
}

/// One bin on the suggested collection route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    /// Bin to empty.
    pub bin_id: BinId,
    /// Bin display name.
    pub name: String,
    /// Location string.
    pub location: String,
    /// Current fill level.
    pub fill_level: f64,
}

/// Suggested collection route: full bins first, then alert sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    /// Critical bins, fullest first.
    pub stops: Vec<RouteStop>,
    /// Locations of active alerts.
    pub alert_locations: Vec<String>,
    /// One-line summary, e.g. `"Start → 2 full bins → 1 alerts"`.
    pub summary: String,
}

/// Severity of a transient notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Something went wrong.
    Error,
}

/// A transient toast message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Message text.
    pub message: String,
    /// Severity.
    pub level: NotificationLevel,
}

/// Everything the dashboard shows, as one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Connectivity label.
    pub connection: ConnectionStatus,
    /// Header statistics.
    pub stats: StatsView,
    /// Every marker ever placed, by bin ID.
    pub markers: Vec<Marker>,
    /// Alert sidebar.
    pub alerts: AlertList,
    /// Detail chart for the selected bin.
    pub chart: Option<ChartView>,
    /// Suggested collection route.
    pub route: RouteView,
    /// Most recent toast, if any.
    pub notification: Option<Notification>,
}
