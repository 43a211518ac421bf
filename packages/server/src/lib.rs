#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web view server for the eco-guardian dashboard.
//!
//! Starts the dashboard actor and its timers, then serves the latest
//! [`eco_guardian_view_models::DashboardView`] as JSON along with a small
//! HTML shell that polls it and draws the map and detail chart.

mod handlers;
mod html;
pub mod interactive;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use eco_guardian_dashboard::config::port as parse_port;
use eco_guardian_dashboard::{ConfigError, Dashboard, DashboardConfig, DashboardHandle};

/// Bind address used when `BIND_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable holding the bind address.
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";
/// Environment variable holding the port.
pub const PORT_VAR: &str = "PORT";

/// Shared application state.
pub struct AppState {
    /// Handle to the running dashboard actor.
    pub dashboard: DashboardHandle,
}

/// Where the view server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` is set but is not a
    /// port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` is set but is not a
    /// port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(BIND_ADDR_VAR)
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = match lookup(PORT_VAR) {
            Some(value) => parse_port(PORT_VAR, &value)?,
            None => DEFAULT_PORT,
        };

        Ok(Self { bind_addr, port })
    }
}

/// Registers every route on `cfg`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/view", web::get().to(handlers::view))
            .route("/bins/{id}/select", web::post().to(handlers::select_bin)),
    )
    .route("/", web::get().to(handlers::index));
}

/// Starts the dashboard and the view server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dashboard cannot be started
/// from `dashboard_config`, or if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(
    dashboard_config: &DashboardConfig,
    server_config: &ServerConfig,
) -> std::io::Result<()> {
    log::info!("Starting dashboard against {}", dashboard_config.base_url);
    let dashboard = Dashboard::start(dashboard_config).map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState {
        dashboard: dashboard.handle.clone(),
    });

    let ServerConfig { bind_addr, port } = server_config.clone();
    log::info!("Starting server on {bind_addr}:{port}");

    let result = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((bind_addr, port))?
    .run()
    .await;

    log::info!("Server stopped, shutting down dashboard");
    dashboard.shutdown();

    result
}
