//! The alert sidebar.

use chrono::{DateTime, Utc};
use eco_guardian_bin_models::Alert;
use eco_guardian_view_models::{AlertAction, AlertItem, AlertList};

/// Shown in place of entries when there are no alerts.
pub const NO_ALERTS_PLACEHOLDER: &str = "No active alerts";

/// Shown in place of a timestamp the backend didn't send.
pub const UNKNOWN_TIME: &str = "Unknown time";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Rebuilds the sidebar from scratch.
#[must_use]
pub fn render_alerts(alerts: &[Alert]) -> AlertList {
    if alerts.is_empty() {
        return AlertList {
            items: Vec::new(),
            placeholder: Some(NO_ALERTS_PLACEHOLDER.to_string()),
        };
    }

    AlertList {
        items: alerts.iter().map(render_item).collect(),
        placeholder: None,
    }
}

fn render_item(alert: &Alert) -> AlertItem {
    AlertItem {
        id: alert.id,
        alert_type: alert.alert_type.as_str().to_string(),
        type_label: alert.alert_type.label().to_string(),
        location: alert.location.clone(),
        time_text: format_time(alert.timestamp),
        actions: vec![AlertAction::View, AlertAction::Resolve],
    }
}

/// Formats an alert timestamp for display.
#[must_use]
pub fn format_time(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || UNKNOWN_TIME.to_string(),
        |ts| ts.format(TIME_FORMAT).to_string(),
    )
}
