//! Task Lists API
//!
//! Session-authenticated REST API for personal task lists and tasks.
//!
//! # Environment Variables
//!
//! - `CONFIG_PATH`: YAML configuration file (default: `config.yaml`)
//! - `RUST_LOG`: Logging filter; overrides the level chosen by `is_debug`

use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_lists_api::api::{self, AppState};
use task_lists_api::config::{Config, ListenType};
use task_lists_api::infrastructure::RepositoryFactory;

/// File name of the unix socket created in `sock` listen mode.
const SOCKET_FILE_NAME: &str = "app.sock";

fn main() {
    dotenvy::dotenv().ok();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Failed to create tokio runtime: {error}");
            std::process::exit(1);
        }
    };
    runtime.block_on(async_main());
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_log_filter().into());

    if config.is_debug {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    }
}

async fn async_main() {
    let config_path = Config::path_from_env();
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(error) => {
            // Tracing is configured from the file, so it is not up yet.
            eprintln!("Configuration error: {error}");
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!(
        path = %config_path.display(),
        storage_mode = ?config.storage.mode,
        session_mode = ?config.sessions.mode,
        "Starting Task Lists API"
    );

    let repositories = match RepositoryFactory::new(&config).create().await {
        Ok(repositories) => repositories,
        Err(error) => {
            tracing::error!(%error, "Failed to initialize repositories");
            std::process::exit(1);
        }
    };

    let application = api::router(AppState::from_repositories(repositories), &config);

    let served = match config.listen.listen_type {
        ListenType::Tcp => serve_tcp(&config, application).await,
        ListenType::Sock => serve_unix(application).await,
    };

    if let Err(error) = served {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

async fn serve_tcp(config: &Config, application: axum::Router) -> std::io::Result<()> {
    let address = format!("{}:{}", config.listen.bind_ip, config.listen.port);
    let listener = TcpListener::bind(&address).await.map_err(|error| {
        tracing::error!(%error, "Failed to bind to address {}", address);
        error
    })?;

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Returns `app.sock` in the directory holding the executable.
fn socket_path() -> std::io::Result<PathBuf> {
    let executable = std::env::current_exe()?;
    let directory = executable
        .parent()
        .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf);
    Ok(directory.join(SOCKET_FILE_NAME))
}

#[cfg(unix)]
async fn serve_unix(application: axum::Router) -> std::io::Result<()> {
    let path = socket_path()?;

    // A socket left behind by a previous run blocks the bind.
    match std::fs::remove_file(&path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed stale socket"),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }

    let listener = tokio::net::UnixListener::bind(&path)?;
    tracing::info!(path = %path.display(), "Listening on unix socket");

    axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(not(unix))]
async fn serve_unix(_application: axum::Router) -> std::io::Result<()> {
    let path = socket_path()?;
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("unix sockets are not available on this platform: {}", path.display()),
    ))
}

/// Handles graceful shutdown signals (SIGINT, SIGTERM).
///
/// On Unix systems it listens for both SIGINT (Ctrl+C) and SIGTERM; on other
/// systems only for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
