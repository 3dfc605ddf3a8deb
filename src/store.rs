// src/store.rs
// Correlation store: request_id -> completion feedback, consume-on-read
//
// The transport's feedback loop inserts from its own task while tool calls
// poll concurrently, so every check-and-remove happens under one lock.

use crate::messages::MoveCompletion;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

struct StoredCompletion {
    completion: MoveCompletion,
    recorded_at: Instant,
}

/// Thread-safe map of completed moves awaiting their first status poll.
///
/// Entries are created only by feedback arrival, never by command
/// initiation: a pending move has no entry. The first successful
/// `take_if_completed` consumes the entry, after which the id looks the
/// same as one that never completed.
#[derive(Default)]
pub struct CompletionStore {
    entries: Mutex<HashMap<String, StoredCompletion>>,
}

impl CompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the completion for its request id.
    ///
    /// A payload without a usable request id is a no-op here; the caller
    /// (the feedback loop) is responsible for logging the drop.
    pub fn record_completion(&self, completion: MoveCompletion) {
        if !completion.has_request_id() {
            return;
        }
        let mut entries = self.lock_entries();
        entries.insert(
            completion.request_id.clone(),
            StoredCompletion {
                completion,
                recorded_at: Instant::now(),
            },
        );
    }

    /// Atomically check for and remove the completion for `request_id`.
    ///
    /// Exactly one concurrent caller can win a given entry; everyone else
    /// (and every later call) sees `None`, whether the move is still
    /// running, the id was never issued, or the entry was already consumed.
    pub fn take_if_completed(&self, request_id: &str) -> Option<MoveCompletion> {
        let mut entries = self.lock_entries();
        entries.remove(request_id).map(|stored| stored.completion)
    }

    /// Drop entries older than `ttl`, returning how many were evicted.
    ///
    /// Completions that are never polled would otherwise accumulate
    /// forever; the background sweeper calls this periodically.
    pub fn evict_stale(&self, ttl: Duration) -> usize {
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, stored| stored.recorded_at.elapsed() < ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredCompletion>> {
        // A poisoned lock just means a panicking thread held it; the map
        // itself is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
