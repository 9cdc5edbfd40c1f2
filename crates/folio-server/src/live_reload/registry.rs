//! Connected live-reload clients.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;

/// One-shot reload channels keyed by client id.
///
/// A client registers before waiting for the next rebuild; a rebuild fires
/// and removes every registered channel, so each client re-registers after
/// being notified.
#[derive(Debug, Default)]
pub(crate) struct ReloadRegistry {
    next_id: AtomicU64,
    clients: Mutex<HashMap<u64, oneshot::Sender<()>>>,
}

impl ReloadRegistry {
    /// Register a client for the next reload.
    pub(crate) fn register(&self) -> (u64, oneshot::Receiver<()>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.lock().insert(id, tx);
        (id, rx)
    }

    /// Forget a client that went away.
    pub(crate) fn deregister(&self, id: u64) {
        self.lock().remove(&id);
    }

    /// Fire every registered channel. Returns how many clients were reached.
    pub(crate) fn notify_all(&self) -> usize {
        let clients: Vec<_> = self.lock().drain().map(|(_, tx)| tx).collect();
        clients
            .into_iter()
            .map(|tx| tx.send(()))
            .filter(Result::is_ok)
            .count()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, oneshot::Sender<()>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_reaches_registered_clients() {
        let registry = ReloadRegistry::default();
        let (_, first) = registry.register();
        let (_, second) = registry.register();

        assert_eq!(registry.notify_all(), 2);

        assert!(first.await.is_ok());
        assert!(second.await.is_ok());
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn test_deregistered_client_is_skipped() {
        let registry = ReloadRegistry::default();
        let (gone, _rx) = registry.register();
        let (_, stays) = registry.register();

        registry.deregister(gone);

        assert_eq!(registry.notify_all(), 1);
        assert!(stays.await.is_ok());
    }

    #[test]
    fn test_dropped_receiver_not_counted() {
        let registry = ReloadRegistry::default();
        let (_, rx) = registry.register();
        drop(rx);

        assert_eq!(registry.notify_all(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = ReloadRegistry::default();
        let (a, _ra) = registry.register();
        let (b, _rb) = registry.register();

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }
}
