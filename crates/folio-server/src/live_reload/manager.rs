//! Live reload manager.
//!
//! Watches the project directory, rebuilds the site when a watched file
//! settles, and notifies connected browsers after each successful rebuild.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};

use super::debouncer::{Change, ChangeKind, Debouncer};
use super::registry::ReloadRegistry;
use crate::build::{SiteBuilder, WatchSet};

/// Default debounce window in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// How often settled changes are collected.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Owns the file watcher and the reload registry.
pub(crate) struct LiveReloadManager {
    registry: Arc<ReloadRegistry>,
    /// Dropping the watcher stops event delivery.
    #[allow(dead_code)]
    watcher: Option<RecommendedWatcher>,
    debounce_ms: u64,
}

impl Default for LiveReloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveReloadManager {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            registry: Arc::new(ReloadRegistry::default()),
            watcher: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }

    /// Set the debounce window in milliseconds.
    #[must_use]
    pub(crate) fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub(crate) fn registry(&self) -> &ReloadRegistry {
        &self.registry
    }

    /// Start watching `watch_set.root_dir` and spawn the rebuild task.
    ///
    /// Rebuilds run one at a time on the blocking pool. The task stops when
    /// `shutdown` flips.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher cannot be created.
    pub(crate) fn start(
        &mut self,
        builder: SiteBuilder,
        watch_set: WatchSet,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), notify::Error> {
        let (tx, mut rx) = mpsc::channel::<Event>(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                // The callback runs on the watcher's own thread.
                Ok(event) => {
                    let _ = tx.blocking_send(event);
                }
                Err(e) => tracing::warn!(error = %e, "File watcher error"),
            }
        })?;
        watcher.watch(&watch_set.root_dir, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);

        tracing::info!(root = %watch_set.root_dir.display(), "Watching for changes");

        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(self.debounce_ms)));

        let recorder = Arc::clone(&debouncer);
        let output_dir = watch_set.output_dir.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                Self::record_event(&event, &output_dir, &recorder);
            }
        });

        tokio::spawn(Self::rebuild_loop(
            debouncer,
            builder,
            watch_set,
            Arc::clone(&self.registry),
            shutdown,
        ));

        Ok(())
    }

    fn record_event(event: &Event, output_dir: &Path, debouncer: &Debouncer) {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Remove(_) => ChangeKind::Removed,
            _ => return,
        };

        for path in &event.paths {
            if path.starts_with(output_dir) {
                continue;
            }
            debouncer.record(path.clone(), kind);
        }
    }

    async fn rebuild_loop(
        debouncer: Arc<Debouncer>,
        builder: SiteBuilder,
        mut watch_set: WatchSet,
        registry: Arc<ReloadRegistry>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => break,
            }

            let changes: Vec<Change> = debouncer
                .take_settled()
                .into_iter()
                .filter(|c| watch_set.contains(&c.path))
                .collect();
            if !Self::needs_rebuild(&changes) {
                continue;
            }

            let start = Instant::now();
            let job = builder.clone();
            match tokio::task::spawn_blocking(move || job.build()).await {
                Ok(Ok(next)) => {
                    watch_set = next;
                    let clients = registry.notify_all();
                    tracing::info!(
                        changed = changes.len(),
                        clients,
                        elapsed_ms = start.elapsed().as_millis(),
                        "Site rebuilt"
                    );
                }
                Ok(Err(e)) => tracing::error!(error = %e, "Rebuild failed, keeping previous output"),
                Err(e) => tracing::error!(error = %e, "Rebuild task failed"),
            }
        }

        tracing::debug!("Rebuild loop stopped");
    }

    /// Removals alone don't trigger a rebuild.
    fn needs_rebuild(changes: &[Change]) -> bool {
        let mut rebuild = false;
        for change in changes {
            if change.kind == ChangeKind::Removed {
                tracing::debug!(path = %change.path.display(), "Ignoring removed file");
            } else {
                tracing::debug!(path = %change.path.display(), kind = ?change.kind, "Detected change");
                rebuild = true;
            }
        }
        rebuild
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn change(path: &str, kind: ChangeKind) -> Change {
        Change {
            path: PathBuf::from(path),
            kind,
        }
    }

    #[test]
    fn test_removals_alone_do_not_rebuild() {
        assert!(!LiveReloadManager::needs_rebuild(&[]));
        assert!(!LiveReloadManager::needs_rebuild(&[change(
            "/site/a.md",
            ChangeKind::Removed
        )]));
        assert!(LiveReloadManager::needs_rebuild(&[
            change("/site/a.md", ChangeKind::Removed),
            change("/site/b.md", ChangeKind::Modified),
        ]));
    }

    #[test]
    fn test_output_events_are_not_recorded() {
        let debouncer = Debouncer::new(Duration::ZERO);
        let event = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/site/docs/index.html"))
            .add_path(PathBuf::from("/site/index.md"));

        LiveReloadManager::record_event(&event, Path::new("/site/docs"), &debouncer);

        let recorded: Vec<_> = debouncer.take_settled().into_iter().map(|c| c.path).collect();
        assert_eq!(recorded, vec![PathBuf::from("/site/index.md")]);
    }

    #[test]
    fn test_access_events_are_ignored() {
        let debouncer = Debouncer::new(Duration::ZERO);
        let event = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("/site/index.md"));

        LiveReloadManager::record_event(&event, Path::new("/site/docs"), &debouncer);

        assert!(debouncer.take_settled().is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_loop_stops_on_shutdown() {
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(LiveReloadManager::rebuild_loop(
            Arc::new(Debouncer::new(Duration::ZERO)),
            SiteBuilder::new(PathBuf::from("/nonexistent/.docs.yaml"), Default::default()),
            WatchSet::default(),
            Arc::new(ReloadRegistry::default()),
            rx,
        ));

        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
