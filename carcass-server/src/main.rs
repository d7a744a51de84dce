//! carcass-server - read-only carcass grading API
//!
//! Serves legacy vs predicted grading records from the SQLite record store
//! and the pre-rendered analysis images from disk.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use carcass_common::config::{load_toml_config, ServerConfig, ServerOverrides};
use carcass_server::api::BuildInfo;
use carcass_server::{build_router, db, AppState};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

/// Command-line arguments for carcass-server
#[derive(Parser, Debug)]
#[command(name = "carcass-server")]
#[command(about = "Read-only HTTP API for carcass grading comparison")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "CARCASS_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database containing the carcass_analysis table
    #[arg(short, long, env = "CARCASS_DATABASE")]
    database: Option<PathBuf>,

    /// Directory containing original_images/, legacy_images/, processed_images/
    #[arg(short, long, env = "CARCASS_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Built front-end to serve at /
    #[arg(long, env = "CARCASS_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CARCASS_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CARCASS_PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let file = load_toml_config(args.config.as_deref());
    let config = ServerConfig::resolve(
        ServerOverrides {
            database_path: args.database,
            images_dir: args.images_dir,
            static_dir: args.static_dir,
            bind: args.bind,
            port: args.port,
            log_level: args.log_level,
        },
        &file,
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!("Starting {}", BuildInfo::current());

    info!("Database path: {}", config.database_path.display());
    let pool = match db::connect_readonly(&config.database_path).await {
        Ok(pool) => {
            info!("Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    info!("Images root: {}", config.images_dir.display());
    if !config.images_dir.is_dir() {
        warn!(
            "Images root {} does not exist; every image will report unavailable",
            config.images_dir.display()
        );
    }

    let mut state = AppState::new(pool, config.images_dir.clone());
    match &config.static_dir {
        Some(dir) => {
            info!("Serving front-end from {}", dir.display());
            state = state.with_static_dir(dir.clone());
        }
        None => info!("No static dir configured; serving API and images only"),
    }
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("carcass-server listening on http://{}", addr);
    info!("API available at http://{}/api", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
