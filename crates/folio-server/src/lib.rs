//! Development server for folio sites.
//!
//! Builds the site once, serves the rendered output over HTTP and, with live
//! reload enabled, rebuilds on every change and tells connected browsers to
//! reload.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         config_path: PathBuf::from("/work/site/.docs.yaml"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (folio-server)
//!                        │
//!                        ├─► GET /<path> ──► <root>/docs/<path>/index.html
//!                        │
//!                        └─► WebSocket /reload ◄── ReloadRegistry
//!                                                       ▲
//! notify ──► Debouncer ──► rebuild task (spawn_blocking: load + render)
//! ```

mod app;
mod build;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use folio_config::{ConfigOverrides, DEFAULT_CONFIG_FILENAME};
use tokio::sync::watch;

pub use error::ServerError;

use build::SiteBuilder;
use live_reload::LiveReloadManager;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site configuration file.
    pub config_path: PathBuf,
    /// Rebuild on change and push reloads to browsers.
    pub live_reload_enabled: bool,
    /// Debounce window for file changes, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3500,
            config_path: PathBuf::from(DEFAULT_CONFIG_FILENAME),
            live_reload_enabled: true,
            debounce_ms: 100,
        }
    }
}

impl ServerConfig {
    /// Base URL the served site is rendered with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the site and serve it until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the initial build fails, the watcher cannot be
/// started or the listener cannot be bound. Failed rebuilds are logged and
/// do not stop the server.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let overrides = ConfigOverrides {
        base_url: Some(config.base_url()),
    };
    // Watcher events carry absolute paths.
    let config_path = std::path::absolute(&config.config_path)?;
    let builder = SiteBuilder::new(config_path, overrides);

    let watch_set = builder.build()?;
    let output_dir = watch_set.output_dir.clone();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let live_reload = if config.live_reload_enabled {
        let mut manager = LiveReloadManager::new().with_debounce_ms(config.debounce_ms);
        manager.start(builder, watch_set, shutdown_rx.clone())?;
        Some(manager)
    } else {
        None
    };

    let state = Arc::new(AppState {
        output_dir,
        live_reload,
        shutdown: shutdown_rx.clone(),
    });
    let app = app::create_router(state);

    let address = config.address();
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!(address = %address, base_url = %config.base_url(), "Serving site");

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received, stopping server...");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => tracing::error!(error = %e, "Unable to listen for Ctrl-C"),
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .await?;

    Ok(())
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
