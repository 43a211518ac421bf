//! The task that owns [`DashboardState`].
//!
//! Timers, fetch tasks, and the view server never touch the state. They
//! send [`Command`]s; the actor applies them one at a time and publishes
//! a fresh [`DashboardView`] after each one.

use chrono::Utc;
use eco_guardian_bin_models::{BinId, DashboardResponse};
use eco_guardian_fetcher::FetchError;
use eco_guardian_view_models::{ChartView, DashboardView};
use rand::Rng;
use tokio::sync::{mpsc, oneshot, watch};

use crate::DashboardError;
use crate::state::DashboardState;

/// Capacity of the command queue.
pub const COMMAND_BUFFER: usize = 64;

/// A request for the actor.
#[derive(Debug)]
pub enum Command {
    /// A fetch task finished.
    FetchCompleted(Result<DashboardResponse, FetchError>),
    /// The drift timer fired.
    Drift,
    /// The user picked a bin.
    Select {
        /// Bin to chart.
        bin_id: BinId,
        /// Receives the new chart, or `None` for an unknown bin.
        reply: oneshot::Sender<Option<ChartView>>,
    },
}

/// Owns the state and applies commands in arrival order.
pub struct DashboardActor<R> {
    state: DashboardState,
    rng: R,
    commands: mpsc::Receiver<Command>,
    views: watch::Sender<DashboardView>,
}

impl<R: Rng + Send> DashboardActor<R> {
    /// Creates an actor and the handle used to talk to it.
    pub fn new(rng: R) -> (Self, DashboardHandle) {
        let state = DashboardState::new(Utc::now());
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (views_tx, views_rx) = watch::channel(state.view());

        let actor = Self {
            state,
            rng,
            commands: commands_rx,
            views: views_tx,
        };
        let handle = DashboardHandle {
            commands: commands_tx,
            views: views_rx,
        };

        (actor, handle)
    }

    /// Processes commands until every [`DashboardHandle`] is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
            self.views.send_replace(self.state.view());
        }
        log::debug!("Dashboard actor stopped: all handles dropped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::FetchCompleted(result) => {
                self.state
                    .refresh_completed(result, &mut self.rng, Utc::now());
            }
            Command::Drift => {
                if let Some(id) = self.state.drift(&mut self.rng, Utc::now()) {
                    log::debug!("Drift tick moved bin #{id}");
                }
            }
            Command::Select { bin_id, reply } => {
                let chart = self.state.select(bin_id, Utc::now());
                if reply.send(chart).is_err() {
                    log::debug!("Selection of bin #{bin_id} abandoned by caller");
                }
            }
        }
    }
}

/// Cheap, cloneable access to a running dashboard.
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    views: watch::Receiver<DashboardView>,
}

impl DashboardHandle {
    /// The most recently published view.
    #[must_use]
    pub fn latest(&self) -> DashboardView {
        self.views.borrow().clone()
    }

    /// A receiver that is notified whenever a new view is published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.views.clone()
    }

    /// Tears down the detail chart and builds one for `bin_id`.
    ///
    /// Returns `Ok(None)` if no active bin has that ID.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Closed`] if the actor has stopped.
    pub async fn select(&self, bin_id: BinId) -> Result<Option<ChartView>, DashboardError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Select { bin_id, reply }).await?;
        response.await.map_err(|_| DashboardError::Closed)
    }

    /// Queues a command for the actor.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Closed`] if the actor has stopped.
    pub async fn send(&self, command: Command) -> Result<(), DashboardError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DashboardError::Closed)
    }

    /// Whether the actor has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

#[cfg(test)]
impl DashboardHandle {
    /// Builds a handle over raw channels so tests can observe commands.
    pub(crate) const fn from_parts(
        commands: mpsc::Sender<Command>,
        views: watch::Receiver<DashboardView>,
    ) -> Self {
        Self { commands, views }
    }
}
