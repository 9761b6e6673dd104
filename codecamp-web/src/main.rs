//! codecamp-web - Codecamp event service
//!
//! Serves schedules, track/timeslot availability, speakers and announcements
//! from `<root_folder>/codecamp.db`, creating the database on first start.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use codecamp_common::api::auth::load_shared_secret;
use codecamp_common::config::{load_toml_config, RootFolderInitializer, RootFolderResolver};
use codecamp_common::db::init_database;
use codecamp_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for codecamp-web
#[derive(Parser, Debug)]
#[command(name = "codecamp-web")]
#[command(about = "Codecamp event schedule service")]
#[command(version)]
struct Args {
    /// Bootstrap TOML file (defaults to the platform config directory)
    #[arg(short, long, env = "CODECAMP_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding codecamp.db (beats CODECAMP_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "CODECAMP_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so its log level can apply
    let config = load_toml_config(args.config.as_deref()).context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("codecamp_web={0},codecamp_common={0},tower_http=info", config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Codecamp web service (codecamp-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new("codecamp-web")
        .with_cli_arg(args.root_folder)
        .with_toml_config(&config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let shared_secret = load_shared_secret(&pool)
        .await
        .context("Failed to load API shared secret")?;
    if shared_secret == 0 {
        warn!("API authentication disabled (shared_secret = 0)");
    } else {
        info!("Loaded shared secret for API authentication");
    }

    let state = AppState::from_config(pool, shared_secret, &config);
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", config.bind_address, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("codecamp-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
