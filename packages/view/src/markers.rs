//! Map markers keyed by bin ID.
//!
//! Markers are created the first time a bin is seen and updated in place
//! afterwards. There is no removal: a bin that drops out of the feed keeps
//! its last marker on the map.

use std::collections::BTreeMap;

use eco_guardian_bin_models::{Bin, BinId, BinModelError, Coordinates};
use eco_guardian_view_models::{Marker, Popup};

/// Label of the popup button that selects a bin.
pub const VIEW_DETAILS_LABEL: &str = "View Details";

/// Owns every marker on the map.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: BTreeMap<BinId, Marker>,
}

impl MarkerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            markers: BTreeMap::new(),
        }
    }

    /// Creates the marker for `bin`, or updates its icon, position, and
    /// popup if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`BinModelError::InvalidLocation`] if the bin's location
    /// doesn't parse. The registry is left unchanged in that case.
    pub fn upsert(&mut self, bin: &Bin) -> Result<&Marker, BinModelError> {
        let coords = bin.coordinates()?;

        let marker = self
            .markers
            .entry(bin.id)
            .and_modify(|marker| apply(marker, bin, coords))
            .or_insert_with(|| {
                log::debug!("Placing marker for bin #{}", bin.id);
                build(bin, coords)
            });

        Ok(marker)
    }

    /// The marker for `id`, if one was ever placed.
    #[must_use]
    pub fn get(&self, id: BinId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    /// Number of markers on the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no marker was ever placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// All markers, ordered by bin ID.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }
}

fn build(bin: &Bin, coords: Coordinates) -> Marker {
    let status = bin.status();
    Marker {
        bin_id: bin.id,
        latitude: coords.latitude,
        longitude: coords.longitude,
        fill_level: bin.fill_level,
        status,
        color: status.color().to_string(),
        icon_text: percent(bin.fill_level),
        popup: Popup {
            title: bin.display_name(),
            fill_text: percent(bin.fill_level),
            status_text: status.label().to_string(),
            action_label: VIEW_DETAILS_LABEL.to_string(),
        },
    }
}

fn apply(marker: &mut Marker, bin: &Bin, coords: Coordinates) {
    let status = bin.status();

    marker.latitude = coords.latitude;
    marker.longitude = coords.longitude;
    marker.fill_level = bin.fill_level;
    marker.status = status;
    marker.color.clear();
    marker.color.push_str(status.color());
    marker.icon_text = percent(bin.fill_level);
    marker.popup.title = bin.display_name();
    marker.popup.fill_text = percent(bin.fill_level);
    marker.popup.status_text.clear();
    marker.popup.status_text.push_str(status.label());
}

/// Formats a fill level as a whole percentage.
#[must_use]
pub fn percent(level: f64) -> String {
    format!("{level:.0}%")
}
