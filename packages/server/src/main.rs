#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Eco-guardian dashboard server.
//!
//! ```text
//! eco_guardian_server [--api-url URL] [--refresh-secs N] [--drift-secs N]
//!                     [--timeout-secs N] [--bind ADDR] [--port PORT]
//! eco_guardian_server interactive
//! ```
//!
//! Every flag falls back to its environment variable, then to the
//! built-in default.

use std::time::Duration;

use clap::{Parser, Subcommand};
use eco_guardian_dashboard::DashboardConfig;
use eco_guardian_server::ServerConfig;

#[derive(Parser)]
#[command(
    name = "eco_guardian_server",
    about = "Smart waste-bin monitoring dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Seconds between fetches
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    refresh_secs: Option<u64>,

    /// Seconds between simulated drift updates
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    drift_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Address to bind the view server to
    #[arg(long)]
    bind: Option<String>,

    /// Port to bind the view server to
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for settings before starting
    Interactive,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut dashboard = DashboardConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        dashboard.base_url = api_url;
    }
    if let Some(secs) = cli.refresh_secs {
        dashboard.refresh_interval = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.drift_secs {
        dashboard.drift_interval = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.timeout_secs {
        dashboard.request_timeout = Some(Duration::from_secs(secs));
    }

    let mut server = ServerConfig::from_env()?;
    if let Some(bind) = cli.bind {
        server.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        server.port = port;
    }

    match cli.command {
        Some(Commands::Interactive) => {
            eco_guardian_server::interactive::run(dashboard, server).await?;
        }
        None => eco_guardian_server::run_server(&dashboard, &server).await?,
    }

    Ok(())
}
