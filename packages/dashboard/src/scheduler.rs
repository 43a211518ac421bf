//! The two dashboard timers.
//!
//! The refresh timer fires immediately and then every refresh period.
//! Each tick spawns its own fetch task, so a slow response can still be
//! in flight when the next tick fires. The drift timer first fires one
//! full period after startup.

use std::sync::Arc;
use std::time::Duration;

use eco_guardian_fetcher::DashboardSource;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::actor::{Command, DashboardHandle};

/// Spawns the fetch-and-render timer.
///
/// The timer stops once the actor has stopped.
#[must_use]
pub fn spawn_refresh_timer(
    handle: DashboardHandle,
    source: Arc<dyn DashboardSource>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if handle.is_closed() {
                break;
            }

            log::debug!("Fetching dashboard data from {}", source.describe());

            let handle = handle.clone();
            let source = Arc::clone(&source);
            tokio::spawn(async move {
                let result = source.fetch().await;
                if handle.send(Command::FetchCompleted(result)).await.is_err() {
                    log::debug!("Dropping fetch result: dashboard stopped");
                }
            });
        }
    })
}

/// Spawns the simulated drift timer.
///
/// The timer stops once the actor has stopped.
#[must_use]
pub fn spawn_drift_timer(handle: DashboardHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if handle.send(Command::Drift).await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use eco_guardian_bin_models::DashboardResponse;
    use eco_guardian_fetcher::FetchError;
    use eco_guardian_view_models::{ConnectionStatus, DashboardView};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{mpsc, watch};

    use crate::actor::{COMMAND_BUFFER, DashboardActor};
    use crate::state::DashboardState;

    struct CountingSource {
        started: AtomicUsize,
        delay: Duration,
    }

    impl CountingSource {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                started: AtomicUsize::new(0),
                delay,
            })
        }

        fn started(&self) -> usize {
            self.started.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DashboardSource for CountingSource {
        fn describe(&self) -> &str {
            "counting"
        }

        async fn fetch(&self) -> Result<DashboardResponse, FetchError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(DashboardResponse::default())
        }
    }

    fn raw_handle() -> (DashboardHandle, mpsc::Receiver<Command>) {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let (_views_tx, views) = watch::channel(DashboardState::new(Utc::now()).view());
        (DashboardHandle::from_parts(commands, views), rx)
    }

    /// Counts queued `(fetch, drift)` commands.
    fn drain(rx: &mut mpsc::Receiver<Command>) -> (usize, usize) {
        let mut fetches = 0;
        let mut drifts = 0;
        while let Ok(command) = rx.try_recv() {
            match command {
                Command::FetchCompleted(_) => fetches += 1,
                Command::Drift => drifts += 1,
                Command::Select { .. } => {}
            }
        }
        (fetches, drifts)
    }

    fn fill_levels(views: &mut watch::Receiver<DashboardView>) -> Vec<f64> {
        views
            .borrow_and_update()
            .markers
            .iter()
            .map(|marker| marker.fill_level)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_fires_immediately_then_every_period() {
        let (handle, mut rx) = raw_handle();
        let source = CountingSource::new(Duration::ZERO);
        let timer = spawn_refresh_timer(handle, source.clone(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(drain(&mut rx), (1, 0));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(drain(&mut rx), (1, 0));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(drain(&mut rx), (2, 0));
        assert_eq!(source.started(), 4);

        timer.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetches_overlap() {
        let (handle, mut rx) = raw_handle();
        let source = CountingSource::new(Duration::from_secs(12));
        let timer = spawn_refresh_timer(handle, source.clone(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(source.started(), 3);
        assert_eq!(drain(&mut rx), (0, 0));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(drain(&mut rx), (1, 0));

        timer.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn drift_waits_one_full_period() {
        let (handle, mut rx) = raw_handle();
        let timer = spawn_drift_timer(handle, Duration::from_secs(15));

        tokio::time::sleep(Duration::from_millis(14_900)).await;
        assert_eq!(drain(&mut rx), (0, 0));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(drain(&mut rx), (0, 1));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(drain(&mut rx), (0, 2));

        timer.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn timers_stop_when_actor_stops() {
        let (handle, rx) = raw_handle();
        drop(rx);

        let drift = spawn_drift_timer(handle.clone(), Duration::from_secs(1));
        let source = CountingSource::new(Duration::ZERO);
        let refresh = spawn_refresh_timer(handle, source, Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(drift.is_finished());
        assert!(refresh.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn drift_tick_moves_at_most_one_simulated_bin() {
        let (actor, handle) = DashboardActor::new(StdRng::seed_from_u64(21));
        tokio::spawn(actor.run());

        let mut views = handle.subscribe();
        handle
            .send(Command::FetchCompleted(Err(FetchError::Status {
                status: 503,
                url: "test".to_string(),
            })))
            .await
            .unwrap();
        views
            .wait_for(|view| view.connection == ConnectionStatus::Disconnected)
            .await
            .unwrap();
        let before = fill_levels(&mut views);

        let timer = spawn_drift_timer(handle.clone(), Duration::from_secs(15));
        tokio::time::sleep(Duration::from_secs(16)).await;
        assert!(views.has_changed().unwrap());

        let after = fill_levels(&mut views);
        assert_eq!(before.len(), 8);
        assert_eq!(after.len(), 8);
        let moved = before
            .iter()
            .zip(&after)
            .filter(|(a, b)| (*a - *b).abs() > f64::EPSILON)
            .count();
        assert!(moved <= 1, "{moved} bins moved in one drift tick");

        timer.abort();
    }
}
