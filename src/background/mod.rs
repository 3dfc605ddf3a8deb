// src/background/mod.rs
// Background sweeper for unpolled completions
//
// A completion nobody polls would otherwise live forever in the store; the
// sweeper evicts anything older than the configured TTL.

use crate::config::StoreConfig;
use crate::store::CompletionStore;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawn the TTL sweeper.
///
/// Returns:
/// - shutdown sender (send true to stop the worker)
/// - join handle for the worker task
pub fn spawn(
    store: Arc<CompletionStore>,
    config: StoreConfig,
) -> (watch::Sender<bool>, JoinHandle<()>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(run_sweeper(store, config, shutdown_rx));
    (shutdown_tx, handle)
}

async fn run_sweeper(
    store: Arc<CompletionStore>,
    config: StoreConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!(
        ttl_secs = config.completion_ttl.as_secs(),
        interval_secs = config.sweep_interval.as_secs(),
        "Completion sweeper started"
    );

    loop {
        tokio::select! {
            _ = tokio::time::sleep(config.sweep_interval) => {
                let evicted = store.evict_stale(config.completion_ttl);
                if evicted > 0 {
                    tracing::info!(evicted, "Swept stale completions");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("Completion sweeper shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MoveCompletion;
    use std::time::Duration;

    fn completion(request_id: &str) -> MoveCompletion {
        MoveCompletion {
            request_id: request_id.to_string(),
            object_name: None,
            final_position: None,
            status: None,
            timestamp: None,
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn test_sweeper_evicts_and_shuts_down() {
        let store = Arc::new(CompletionStore::new());
        store.record_completion(completion("stale"));

        let config = StoreConfig {
            completion_ttl: Duration::ZERO,
            sweep_interval: Duration::from_millis(10),
        };
        let (shutdown_tx, handle) = spawn(store.clone(), config);

        // Give the sweeper a couple of ticks
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.is_empty());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_leaves_fresh_entries() {
        let store = Arc::new(CompletionStore::new());
        store.record_completion(completion("fresh"));

        let config = StoreConfig {
            completion_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_millis(10),
        };
        let (shutdown_tx, handle) = spawn(store.clone(), config);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.len(), 1);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
