//! Interactive mode for the server.
//!
//! Prompts for the backend and listener settings before starting.

use dialoguer::{Confirm, Input};
use eco_guardian_dashboard::DashboardConfig;
use eco_guardian_dashboard::config::period;

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the value in `dashboard` or `server`, so
/// pressing enter keeps whatever the environment and flags chose.
///
/// # Errors
///
/// Returns an `std::io::Result` error if a period is invalid or the
/// underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run(dashboard: DashboardConfig, server: ServerConfig) -> std::io::Result<()> {
    println!("Eco-Guardian Dashboard");
    println!();

    let base_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(dashboard.base_url.clone())
        .interact_text()
        .unwrap_or_else(|_| dashboard.base_url.clone());

    let refresh_str: String = Input::new()
        .with_prompt("Refresh every (seconds)")
        .default(dashboard.refresh_interval.as_secs().to_string())
        .interact_text()
        .unwrap_or_else(|_| dashboard.refresh_interval.as_secs().to_string());

    let drift_str: String = Input::new()
        .with_prompt("Drift every (seconds)")
        .default(dashboard.drift_interval.as_secs().to_string())
        .interact_text()
        .unwrap_or_else(|_| dashboard.drift_interval.as_secs().to_string());

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(server.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| server.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(server.port)
        .interact_text()
        .unwrap_or(server.port);

    let dashboard = DashboardConfig {
        base_url,
        refresh_interval: period("refresh", &refresh_str).map_err(std::io::Error::other)?,
        drift_interval: period("drift", &drift_str).map_err(std::io::Error::other)?,
        ..dashboard
    };
    let server = ServerConfig { bind_addr, port };

    if !Confirm::new()
        .with_prompt(format!(
            "Poll {} and serve on {}:{}?",
            dashboard.base_url, server.bind_addr, server.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    crate::run_server(&dashboard, &server).await
}
