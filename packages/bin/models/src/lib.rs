#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Bin, alert, and dashboard payload types for the eco-guardian dashboard.
//!
//! These are the wire types returned by the backend's `/api/dashboard`
//! endpoint, plus the fill-level classification shared by every layer
//! that colors or counts bins.

pub mod timestamp;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Identifier of a bin.
pub type BinId = i64;

/// Identifier of the one bin whose readings come from real hardware.
pub const REAL_BIN_ID: BinId = 1;

/// Lowest valid fill level, in percent.
pub const MIN_FILL_LEVEL: f64 = 0.0;

/// Highest valid fill level, in percent.
pub const MAX_FILL_LEVEL: f64 = 100.0;

/// Fill level above which a bin is in the warning band.
pub const WARNING_THRESHOLD: f64 = 60.0;

/// Fill level above which a bin is critical.
pub const CRITICAL_THRESHOLD: f64 = 80.0;

/// Clamps a fill level into `[0, 100]`.
#[must_use]
pub fn clamp_fill_level(level: f64) -> f64 {
    level.clamp(MIN_FILL_LEVEL, MAX_FILL_LEVEL)
}

/// Errors produced while interpreting bin data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BinModelError {
    /// A location string was not a `"lat,lng"` pair of numbers.
    #[error("invalid location {location:?}: expected \"lat,lng\"")]
    InvalidLocation {
        /// The location string as received.
        location: String,
    },
}

/// Fill-level classification of a bin.
///
/// The bands are exclusive at the lower bound: exactly 60% is still
/// normal and exactly 80% is still a warning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FillStatus {
    /// At or below 60%.
    Normal,
    /// Above 60% and at or below 80%.
    Warning,
    /// Above 80%.
    Critical,
}

impl FillStatus {
    /// Classifies a fill level.
    #[must_use]
    pub fn from_fill_level(level: f64) -> Self {
        if level > CRITICAL_THRESHOLD {
            Self::Critical
        } else if level > WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Marker color for this status as a CSS hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Normal => "#2ecc71",
            Self::Warning => "#f39c12",
            Self::Critical => "#e74c3c",
        }
    }

    /// Human-readable status text shown in marker popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Warning => "Getting Full",
            Self::Critical => "Needs Immediate Attention",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Normal, Self::Warning, Self::Critical]
    }
}

/// A latitude/longitude pair parsed from a bin's location string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl FromStr for Coordinates {
    type Err = BinModelError;

    /// Parses `"lat,lng"`. Whitespace around either number is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BinModelError::InvalidLocation {
            location: s.to_string(),
        };

        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lng.trim().parse().map_err(|_| invalid())?;

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid());
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A monitored waste bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Unique bin ID. ID 1 is the real, sensor-backed bin.
    pub id: BinId,
    /// How full the bin is, in percent.
    pub fill_level: f64,
    /// Location as a `"lat,lng"` string.
    pub location: String,
    /// Optional human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// When the backend last received a reading for this bin.
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Bin {
    /// Fill-level classification of this bin.
    #[must_use]
    pub fn status(&self) -> FillStatus {
        FillStatus::from_fill_level(self.fill_level)
    }

    /// Parses the location string.
    ///
    /// # Errors
    ///
    /// Returns [`BinModelError::InvalidLocation`] if the location is not a
    /// `"lat,lng"` pair.
    pub fn coordinates(&self) -> Result<Coordinates, BinModelError> {
        self.location.parse()
    }

    /// Name shown in marker popups, falling back to `Smart Bin #<id>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Smart Bin #{}", self.id))
    }

    /// Name shown above the detail chart, falling back to `Bin #<id>`.
    #[must_use]
    pub fn short_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("Bin #{}", self.id))
    }

    /// Whether this is the sensor-backed bin.
    #[must_use]
    pub const fn is_real(&self) -> bool {
        self.id == REAL_BIN_ID
    }

    /// Whether this bin's readings are generated locally.
    #[must_use]
    pub const fn is_simulated(&self) -> bool {
        self.id > REAL_BIN_ID
    }
}

/// Kind of event an [`Alert`] reports.
///
/// Types the dashboard doesn't know are kept verbatim in
/// [`AlertType::Other`] so their raw name can still be shown.
///
/// Backend litter alerts carry no type at all; they all come from
/// detection, so that is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    /// A bin reported as overflowing.
    OverflowingBin,
    /// Waste dumped outside a bin.
    IllegalDumping,
    /// A damaged bin.
    BrokenBin,
    /// Litter spotted by the camera pipeline.
    #[default]
    AiDetection,
    /// A report filed by a citizen.
    CitizenReport,
    /// Any other type, carried as received.
    #[strum(default)]
    Other(String),
}

impl AlertType {
    /// The type's wire name, e.g. `overflowing_bin`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::OverflowingBin => "overflowing_bin",
            Self::IllegalDumping => "illegal_dumping",
            Self::BrokenBin => "broken_bin",
            Self::AiDetection => "ai_detection",
            Self::CitizenReport => "citizen_report",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label for the alert list.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::OverflowingBin => "Overflowing Bin",
            Self::IllegalDumping => "Illegal Dumping",
            Self::BrokenBin => "Broken Bin",
            Self::AiDetection => "AI Detection",
            Self::CitizenReport => "Citizen Report",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AlertType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(alert_type) => alert_type,
            Err(_) => Self::Other(value),
        }
    }
}

impl From<AlertType> for String {
    fn from(value: AlertType) -> Self {
        match value {
            AlertType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// An event record describing an anomaly near a bin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert ID.
    pub id: i64,
    /// What kind of event this is.
    #[serde(rename = "type", default)]
    pub alert_type: AlertType,
    /// Where it happened, usually a `"lat,lng"` string.
    pub location: String,
    /// When it was raised.
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Detector confidence in `[0, 1]`, for detection alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Link to the captured image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `GET /api/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Every bin the backend knows about.
    #[serde(default)]
    pub bins: Vec<Bin>,
    /// Most recent alerts, newest first. `None` when the key is absent,
    /// which leaves the current alerts in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    /// `"success"` or `"error"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Server time the payload was produced.
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// Server-side bin count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bins: Option<u64>,
    /// Server-side alert count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_alerts: Option<u64>,
}

impl DashboardResponse {
    /// The sensor-backed bin, if the backend returned it.
    #[must_use]
    pub fn real_bin(&self) -> Option<&Bin> {
        self.bins.iter().find(|bin| bin.id == REAL_BIN_ID)
    }
}
