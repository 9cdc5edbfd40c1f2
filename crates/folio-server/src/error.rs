//! Error types for the development server.

use folio_config::ConfigError;
use folio_site::SiteError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Site failed to load or render.
    #[error("{0}")]
    Site(#[from] SiteError),

    /// Configuration failed to load.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// File watcher could not be set up.
    #[error("Unable to start watcher: {0}")]
    Watch(#[from] notify::Error),

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Listener could not be bound.
    #[error("Unable to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}
