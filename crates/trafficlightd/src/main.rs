//! trafficlightd: the traffic light daemon.
//!
//! Single binary that assembles the monitor:
//! - HTTP transport (reqwest)
//! - Registry of pollers, one per URL, checked every 10 seconds
//! - Renderer + dispatcher
//! - Dashboard + JSON API
//!
//! # Usage
//!
//! ```text
//! trafficlightd serve --port 8080 --config trafficlight.toml --url https://example.com
//! trafficlightd check https://example.com https://example.org
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use trafficlight_core::TrafficLightConfig;
use trafficlight_dashboard::Dispatcher;
use trafficlight_poller::{HttpTransport, Transport};

#[derive(Parser)]
#[command(name = "trafficlightd", about = "Traffic light URL monitor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard and API, polling every registered URL.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(long)]
        port: Option<u16>,

        /// Path to trafficlight.toml.
        #[arg(long)]
        config: Option<PathBuf>,

        /// URL to monitor; repeatable. Registered after the config's URLs.
        #[arg(long = "url")]
        urls: Vec<String>,
    },
    /// Check each URL once and print its status.
    Check {
        /// Path to trafficlight.toml (transport settings only).
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,trafficlightd=debug,trafficlight=debug")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, config, urls } => run_serve(port, config.as_deref(), urls).await,
        Command::Check { config, urls } => run_check(config.as_deref(), urls).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TrafficLightConfig> {
    match path {
        Some(path) => {
            let config = TrafficLightConfig::from_file(path)?;
            info!(path = %path.display(), urls = config.urls.len(), "config loaded");
            Ok(config)
        }
        None => Ok(TrafficLightConfig::default()),
    }
}

async fn run_serve(
    port: Option<u16>,
    config_path: Option<&Path>,
    extra_urls: Vec<String>,
) -> anyhow::Result<()> {
    info!("traffic light daemon starting");

    let config = load_config(config_path)?;
    let port = port.unwrap_or_else(|| config.port());

    // ── Initialize subsystems ──────────────────────────────────

    let transport = HttpTransport::from_config(&config)?;
    info!(timeout = ?config.request_timeout()?, "http transport initialized");

    let dispatcher = Dispatcher::new(Arc::new(transport));

    for mut url in config.urls.iter().cloned().chain(extra_urls) {
        let raw = url.clone();
        if let Err(e) = dispatcher.on_add_url(&mut url) {
            warn!(url = %raw, error = %e, "skipping startup url");
        }
    }
    info!(count = dispatcher.registry().len(), "startup urls registered");

    // ── Start server ───────────────────────────────────────────

    let router = trafficlight_api::build_router(dispatcher.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "dashboard starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
    });

    server.await?;

    dispatcher.shutdown();
    info!("traffic light daemon stopped");
    Ok(())
}

async fn run_check(config_path: Option<&Path>, urls: Vec<String>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let transport = HttpTransport::from_config(&config)?;

    let mut failed = 0;
    for url in &urls {
        let status = transport.get(url).await.status();
        if status != trafficlight_core::LightStatus::Ok {
            failed += 1;
        }
        println!("{status}\t{url}");
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} checks failed", urls.len());
    }
    Ok(())
}
