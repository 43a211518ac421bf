#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! State actor and timers for the eco-guardian dashboard.
//!
//! One actor task owns all dashboard state. Two timers feed it: a refresh
//! timer that fetches from the backend and re-renders everything, and a
//! drift timer that nudges one simulated bin. Readers get immutable
//! [`eco_guardian_view_models::DashboardView`] snapshots through a
//! [`DashboardHandle`].

pub mod actor;
pub mod config;
pub mod scheduler;
pub mod state;

use std::sync::Arc;

use eco_guardian_fetcher::{DashboardSource, FetchError, HttpDashboardSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;

pub use actor::{DashboardActor, DashboardHandle};
pub use config::{ConfigError, DashboardConfig};

/// Errors from starting or talking to the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The dashboard actor has stopped.
    #[error("dashboard actor has stopped")]
    Closed,

    /// Configuration was invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The backend client could not be built.
    #[error("fetcher error: {0}")]
    Fetch(#[from] FetchError),
}

/// A running dashboard: the handle plus its background tasks.
pub struct Dashboard {
    /// Handle for reading views and selecting bins.
    pub handle: DashboardHandle,
    tasks: Vec<JoinHandle<()>>,
}

impl Dashboard {
    /// Starts a dashboard polling the backend named in `config`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Fetch`] if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn start(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let source = HttpDashboardSource::new(&config.base_url, config.request_timeout)?;
        log::info!("Polling {} every {:?}", source.url(), config.refresh_interval);
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Starts a dashboard fed by `source`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn with_source(config: &DashboardConfig, source: Arc<dyn DashboardSource>) -> Self {
        let (actor, handle) = DashboardActor::new(StdRng::from_entropy());

        let tasks = vec![
            tokio::spawn(actor.run()),
            scheduler::spawn_refresh_timer(handle.clone(), source, config.refresh_interval),
            scheduler::spawn_drift_timer(handle.clone(), config.drift_interval),
        ];

        Self { handle, tasks }
    }

    /// Stops the timers and the actor.
    pub fn shutdown(self) {
        for task in self.tasks {
            task.abort();
        }
    }
}
