//! The dashboard's single source of truth.
//!
//! [`DashboardState`] holds every bin, alert, and marker, plus the detail
//! chart. Only the actor in [`crate::actor`] mutates it; everything else
//! sees the [`DashboardView`] snapshots it produces.

use chrono::{DateTime, TimeDelta, Utc};
use eco_guardian_bin_models::{Alert, Bin, BinId, DashboardResponse, REAL_BIN_ID};
use eco_guardian_fetcher::FetchError;
use eco_guardian_view::{DetailChart, MarkerRegistry, plan_route, render_alerts, stats};
use eco_guardian_view_models::{
    ChartView, ConnectionStatus, DashboardView, Notification, NotificationLevel, StatsView,
};
use rand::Rng;

/// How long a toast stays in the published view.
pub const NOTIFICATION_TTL: TimeDelta = TimeDelta::seconds(3);

/// Message shown when a fetch fails after a successful one.
pub const CONNECTION_LOST_MESSAGE: &str = "Lost connection to the dashboard API";

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    expires_at: DateTime<Utc>,
}

/// All mutable dashboard data.
#[derive(Debug, Clone)]
pub struct DashboardState {
    bins: Vec<Bin>,
    alerts: Vec<Alert>,
    markers: MarkerRegistry,
    chart: DetailChart,
    connection: ConnectionStatus,
    stats: StatsView,
    toast: Option<Toast>,
}

impl DashboardState {
    /// Creates an empty state.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            bins: Vec::new(),
            alerts: Vec::new(),
            markers: MarkerRegistry::new(),
            chart: DetailChart::new(),
            connection: ConnectionStatus::default(),
            stats: stats::summarize(&[], &[], now),
            toast: None,
        }
    }

    /// The active bin collection.
    #[must_use]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// The active alerts.
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Connectivity as of the last completed fetch.
    #[must_use]
    pub const fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    /// Every marker placed so far.
    #[must_use]
    pub const fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// The toast currently shown, if it hasn't expired.
    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.toast.as_ref().map(|toast| &toast.notification)
    }

    /// Folds a fetch result into the state.
    ///
    /// A successful fetch replaces the real bin, and replaces the alerts
    /// when the payload carries them. A failed one only flips the
    /// connectivity label; bins and alerts are kept.
    pub fn apply_fetch(&mut self, result: Result<DashboardResponse, FetchError>) {
        match result {
            Ok(response) => {
                if let Some(real) = response.real_bin() {
                    self.merge_real_bin(real.clone());
                }
                if let Some(alerts) = response.alerts {
                    self.alerts = alerts;
                }
                self.connection = ConnectionStatus::Connected;
            }
            Err(e) => {
                log::error!("Error fetching dashboard data: {e}");
                self.connection = ConnectionStatus::Disconnected;
            }
        }
    }

    /// Replaces the real bin, or adds it if it isn't there yet.
    fn merge_real_bin(&mut self, real: Bin) {
        debug_assert_eq!(real.id, REAL_BIN_ID);
        match self.bins.iter_mut().find(|bin| bin.id == REAL_BIN_ID) {
            Some(existing) => *existing = real,
            None => self.bins.push(real),
        }
    }

    /// Rebuilds the simulated part of the fleet.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.bins = eco_guardian_simulation::regenerate(&self.bins, rng);
    }

    /// Redraws every marker and recomputes the statistics.
    pub fn render_all(&mut self, now: DateTime<Utc>) {
        self.stats = eco_guardian_view::render_all(&mut self.markers, &self.bins, &self.alerts, now);
    }

    /// Handles a completed fetch: merge, regenerate, then render.
    ///
    /// Simulation runs whether or not the fetch succeeded. Losing a
    /// previously working connection raises an error toast.
    pub fn refresh_completed<R: Rng + ?Sized>(
        &mut self,
        result: Result<DashboardResponse, FetchError>,
        rng: &mut R,
        now: DateTime<Utc>,
    ) {
        self.expire_notification(now);

        let was_connected = self.connection == ConnectionStatus::Connected;
        self.apply_fetch(result);
        if was_connected && self.connection == ConnectionStatus::Disconnected {
            self.notify(CONNECTION_LOST_MESSAGE.to_string(), NotificationLevel::Error, now);
        }

        self.regenerate(rng);
        self.render_all(now);
    }

    /// Drifts one simulated bin, then redraws only its marker and the
    /// statistics. Returns the bin that moved.
    pub fn drift<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Option<BinId> {
        self.expire_notification(now);

        let id = eco_guardian_simulation::drift(&mut self.bins, rng)?;

        if let Some(bin) = self.bins.iter().find(|bin| bin.id == id) {
            eco_guardian_view::render_markers(&mut self.markers, std::iter::once(bin));
        }
        self.stats = stats::summarize(&self.bins, &self.alerts, now);

        Some(id)
    }

    /// Rebuilds the detail chart for `id`.
    ///
    /// Returns `None`, leaving the current chart alone, if no active bin
    /// has that ID.
    pub fn select(&mut self, id: BinId, now: DateTime<Utc>) -> Option<ChartView> {
        let Some(bin) = self.bins.iter().find(|bin| bin.id == id) else {
            log::debug!("Ignoring selection of unknown bin #{id}");
            return None;
        };

        let message = format!("Viewing details for {}", bin.short_name());
        let chart = self.chart.replace(bin).clone();
        self.notify(message, NotificationLevel::Info, now);

        Some(chart)
    }

    /// Shows a toast for [`NOTIFICATION_TTL`], replacing any current one.
    pub fn notify(&mut self, message: String, level: NotificationLevel, now: DateTime<Utc>) {
        self.toast = Some(Toast {
            notification: Notification { message, level },
            expires_at: now + NOTIFICATION_TTL,
        });
    }

    /// Drops the toast once its lifetime has passed.
    pub fn expire_notification(&mut self, now: DateTime<Utc>) {
        if self.toast.as_ref().is_some_and(|toast| now >= toast.expires_at) {
            self.toast = None;
        }
    }

    /// Produces the full view snapshot.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        DashboardView {
            connection: self.connection,
            stats: self.stats.clone(),
            markers: self.markers.iter().cloned().collect(),
            alerts: render_alerts(&self.alerts),
            chart: self.chart.current().cloned(),
            route: plan_route(&self.bins, &self.alerts),
            notification: self.notification().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_guardian_bin_models::FillStatus;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scenario_response(fill_level: f64) -> DashboardResponse {
        DashboardResponse {
            bins: vec![Bin {
                id: REAL_BIN_ID,
                fill_level,
                location: "28.7402,77.1234".to_string(),
                name: None,
                last_updated: None,
            }],
            alerts: Some(Vec::new()),
            ..DashboardResponse::default()
        }
    }

    fn network_error() -> FetchError {
        FetchError::Status {
            status: 503,
            url: "http://localhost:5000/api/dashboard".to_string(),
        }
    }

    fn ids(state: &DashboardState) -> Vec<BinId> {
        state.bins().iter().map(|bin| bin.id).collect()
    }

    #[test]
    fn successful_fetch_renders_real_and_simulated_bins() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = DashboardState::new(Utc::now());

        state.refresh_completed(Ok(scenario_response(45.0)), &mut rng, Utc::now());
        let view = state.view();

        assert_eq!(view.connection, ConnectionStatus::Connected);
        assert_eq!(ids(&state), (1..=9).collect::<Vec<_>>());

        let real = state.markers().get(REAL_BIN_ID).unwrap();
        assert_eq!(real.status, FillStatus::Normal);
        assert_eq!(real.color, "#2ecc71");

        assert!(view.stats.total_bins >= 9);
        assert_eq!(view.markers.len(), 9);
        assert_eq!(view.alerts.placeholder.as_deref(), Some("No active alerts"));
    }

    #[test]
    fn failed_fetch_falls_back_to_simulation() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = DashboardState::new(Utc::now());

        state.refresh_completed(Err(network_error()), &mut rng, Utc::now());
        let view = state.view();

        assert_eq!(view.connection, ConnectionStatus::Disconnected);
        assert_eq!(view.connection.label(), "Disconnected");
        assert_eq!(ids(&state), (2..=9).collect::<Vec<_>>());
        assert!(state.markers().get(REAL_BIN_ID).is_none());
        assert_eq!(view.stats.total_bins, 8);
    }

    #[test]
    fn failed_fetch_keeps_last_real_bin_and_alerts() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = DashboardState::new(Utc::now());

        let mut response = scenario_response(55.0);
        response.alerts = Some(vec![Alert {
            id: 1,
            alert_type: eco_guardian_bin_models::AlertType::IllegalDumping,
            location: "Market Area".to_string(),
            timestamp: None,
            confidence: None,
            image_url: None,
            description: None,
        }]);
        state.refresh_completed(Ok(response), &mut rng, Utc::now());
        state.refresh_completed(Err(network_error()), &mut rng, Utc::now());

        assert_eq!(state.connection(), ConnectionStatus::Disconnected);
        assert!((state.bins()[0].fill_level - 55.0).abs() < f64::EPSILON);
        assert_eq!(state.alerts().len(), 1);
        assert_eq!(state.view().alerts.items[0].type_label, "Illegal Dumping");
    }

    #[test]
    fn successful_fetch_replaces_alerts_wholesale() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = DashboardState::new(Utc::now());

        let mut first = scenario_response(10.0);
        first.alerts = Some(vec![Alert {
            id: 7,
            alert_type: eco_guardian_bin_models::AlertType::BrokenBin,
            location: "School Road".to_string(),
            timestamp: None,
            confidence: None,
            image_url: None,
            description: None,
        }]);
        state.refresh_completed(Ok(first), &mut rng, Utc::now());
        state.refresh_completed(Ok(scenario_response(12.0)), &mut rng, Utc::now());

        assert!(state.alerts().is_empty());
        assert!((state.bins()[0].fill_level - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn selecting_critical_bin_builds_chart() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = DashboardState::new(Utc::now());

        state.refresh_completed(Ok(scenario_response(92.0)), &mut rng, Utc::now());
        let chart = state.select(REAL_BIN_ID, Utc::now()).unwrap();

        assert_eq!(chart.data, [92.0, 8.0]);
        assert_eq!(chart.revision, 1);

        let marker = state.markers().get(REAL_BIN_ID).unwrap();
        assert_eq!(marker.color, "#e74c3c");
        assert_eq!(marker.popup.status_text, "Needs Immediate Attention");

        let view = state.view();
        assert_eq!(view.chart.unwrap().bin_id, REAL_BIN_ID);
        assert_eq!(
            view.notification.unwrap().message,
            "Viewing details for Bin #1"
        );
    }

    #[test]
    fn reselecting_rebuilds_the_chart() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = DashboardState::new(Utc::now());
        state.refresh_completed(Err(network_error()), &mut rng, Utc::now());

        assert_eq!(state.select(2, Utc::now()).unwrap().revision, 1);
        assert_eq!(state.select(3, Utc::now()).unwrap().revision, 2);
        assert_eq!(state.view().chart.unwrap().bin_id, 3);
    }

    #[test]
    fn selecting_unknown_bin_changes_nothing() {
        let mut state = DashboardState::new(Utc::now());
        assert!(state.select(42, Utc::now()).is_none());

        let view = state.view();
        assert!(view.chart.is_none());
        assert!(view.notification.is_none());
    }

    #[test]
    fn drift_updates_one_marker_and_stats() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = DashboardState::new(Utc::now());
        state.refresh_completed(Ok(scenario_response(45.0)), &mut rng, Utc::now());

        let later = Utc::now();
        let id = state.drift(&mut rng, later).unwrap();
        assert_ne!(id, REAL_BIN_ID);

        let bin = state.bins().iter().find(|bin| bin.id == id).unwrap();
        let marker = state.markers().get(id).unwrap();
        assert!((marker.fill_level - bin.fill_level).abs() < f64::EPSILON);

        let view = state.view();
        assert_eq!(view.stats.last_update, later);
        assert!((state.bins()[0].fill_level - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drift_before_first_fetch_does_nothing() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = DashboardState::new(Utc::now());
        assert!(state.drift(&mut rng, Utc::now()).is_none());
        assert!(state.markers().is_empty());
    }

    #[test]
    fn stale_markers_are_kept() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = DashboardState::new(Utc::now());
        state.refresh_completed(Ok(scenario_response(45.0)), &mut rng, Utc::now());

        // Simulation never drops the real bin, but a feed without it still
        // leaves the marker in place.
        state.bins.retain(|bin| bin.id != REAL_BIN_ID);
        state.render_all(Utc::now());

        assert_eq!(state.view().markers.len(), 9);
        assert_eq!(state.view().stats.total_bins, 8);
    }

    #[test]
    fn payload_without_alerts_keeps_current_alerts() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut state = DashboardState::new(Utc::now());

        let mut first = scenario_response(30.0);
        first.alerts = Some(vec![Alert {
            id: 3,
            location: "Community Center".to_string(),
            ..Alert::default()
        }]);
        state.refresh_completed(Ok(first), &mut rng, Utc::now());

        let mut second = scenario_response(35.0);
        second.alerts = None;
        state.refresh_completed(Ok(second), &mut rng, Utc::now());

        assert_eq!(state.alerts().len(), 1);
        assert_eq!(state.alerts()[0].id, 3);
        assert!((state.bins()[0].fill_level - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn selection_toast_expires_after_ttl() {
        let mut rng = StdRng::seed_from_u64(11);
        let start = Utc::now();
        let mut state = DashboardState::new(start);
        state.refresh_completed(Err(network_error()), &mut rng, start);

        state.select(2, start).unwrap();
        assert_eq!(
            state.view().notification.unwrap().message,
            "Viewing details for Sector-13 Park"
        );

        state.drift(&mut rng, start + TimeDelta::seconds(1));
        assert!(state.notification().is_some());

        state.refresh_completed(Err(network_error()), &mut rng, start + NOTIFICATION_TTL);
        assert!(state.notification().is_none());

        for tick in 4..104 {
            let now = start + TimeDelta::seconds(tick);
            state.refresh_completed(Err(network_error()), &mut rng, now);
            state.drift(&mut rng, now);
        }
        assert!(state.view().notification.is_none());
    }

    #[test]
    fn reselecting_restarts_the_toast() {
        let mut rng = StdRng::seed_from_u64(12);
        let start = Utc::now();
        let mut state = DashboardState::new(start);
        state.refresh_completed(Err(network_error()), &mut rng, start);

        state.select(2, start).unwrap();
        state.select(3, start + TimeDelta::seconds(2)).unwrap();
        state.drift(&mut rng, start + TimeDelta::seconds(4));

        assert_eq!(
            state.notification().unwrap().message,
            "Viewing details for Community Center"
        );
    }

    #[test]
    fn losing_connection_raises_error_toast() {
        let mut rng = StdRng::seed_from_u64(13);
        let start = Utc::now();
        let mut state = DashboardState::new(start);

        state.refresh_completed(Err(network_error()), &mut rng, start);
        assert!(state.notification().is_none());

        state.refresh_completed(Ok(scenario_response(40.0)), &mut rng, start);
        state.refresh_completed(Err(network_error()), &mut rng, start);

        let toast = state.view().notification.unwrap();
        assert_eq!(toast.level, NotificationLevel::Error);
        assert_eq!(toast.message, CONNECTION_LOST_MESSAGE);

        state.refresh_completed(
            Err(network_error()),
            &mut rng,
            start + NOTIFICATION_TTL,
        );
        assert!(state.notification().is_none());
    }
}
