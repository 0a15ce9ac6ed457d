//! Plant Doctor Server
//!
//! HTTP API around the plant-likeness screen. Clients post the raw bytes of
//! a leaf photo and get back either the bare verdict (`/screen`) or a full
//! scan report with a diagnosis (`/scan`). The server renders no pages.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::state::{AppState, SharedState};

/// Plant Doctor Server
#[derive(Parser, Debug)]
#[command(name = "plant-doctor-server")]
#[command(version)]
#[command(about = "HTTP API for screening and scanning leaf photos")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "PLANT_DOCTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "PLANT_DOCTOR_PORT")]
    port: Option<u16>,

    /// Host to bind to (overrides the config file)
    #[arg(long, env = "PLANT_DOCTOR_HOST")]
    host: Option<String>,

    /// Fixed seed for the placeholder diagnoser
    #[arg(long, env = "PLANT_DOCTOR_SEED")]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Builds the router with all routes and middleware
pub(crate) fn build_router(state: SharedState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/labels", get(routes::labels::list_labels))
        .route("/screen", post(routes::scan::screen_image))
        .route("/scan", post(routes::scan::scan_image))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut config = plant_core::load_app_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if cli.seed.is_some() {
        config.diagnosis.seed = cli.seed;
    }

    info!("Plant Doctor Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!(
        "  Green band:  {:?} (> {})",
        config.screen.green, config.screen.green_threshold
    );
    info!(
        "  Brown band:  {:?} (> {})",
        config.screen.brown, config.screen.brown_threshold
    );
    info!("  Max upload:  {} bytes", config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = Arc::new(AppState::from_config(config)?);
    info!("  Diagnoser:   {}", state.scanner.diagnoser().name());

    let app = build_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
