//! Expired-Key Sweep Task
//!
//! Background task that periodically purges expired memory store keys.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a task that calls [`MemoryStore::cleanup_expired`] every
/// `interval_secs` seconds (at least one).
///
/// Reads already skip expired keys; the sweep only reclaims memory for keys
/// nobody reads again. Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let handle = spawn_sweep_task(store.clone(), 1);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(store: Arc<MemoryStore>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!("Starting expired-key sweep every {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = store.cleanup_expired();
            if removed > 0 {
                info!("Sweep removed {} expired keys", removed);
            } else {
                debug!("Sweep found no expired keys");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Pairs, Store};

    fn one(key: &str) -> Pairs {
        let mut pairs = Pairs::new();
        pairs.set(key, "value");
        pairs
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_keys() {
        let store = Arc::new(MemoryStore::new());
        store.save(one("expire_soon"), Some(1)).unwrap();

        let handle = spawn_sweep_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Purged without any read touching it
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_live_keys() {
        let store = Arc::new(MemoryStore::new());
        store.save(one("long_lived"), Some(3600)).unwrap();
        store.save(one("forever"), None).unwrap();

        let handle = spawn_sweep_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(store.exists("long_lived").unwrap());
        assert!(store.exists("forever").unwrap());

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_can_be_aborted() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_sweep_task(store, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
