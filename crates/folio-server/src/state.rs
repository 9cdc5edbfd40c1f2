//! State shared by the page and reload handlers.

use std::path::PathBuf;

use tokio::sync::watch;

use crate::live_reload::LiveReloadManager;

pub(crate) struct AppState {
    /// Directory holding the rendered site.
    pub(crate) output_dir: PathBuf,
    /// Present when pages are served with the reload script.
    pub(crate) live_reload: Option<LiveReloadManager>,
    /// Flips to `true` when the server is shutting down.
    pub(crate) shutdown: watch::Receiver<bool>,
}

impl AppState {
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }
}
