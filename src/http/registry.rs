//! Pending-request registry with supersede-on-duplicate semantics.
//!
//! T011: Implement RequestRegistry with add/remove/settle
//! T012: Implement cancel-one and cancel-all operations

use crate::http::key::request_key;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::task::AbortHandle;

/// Opaque token that aborts an in-flight operation.
///
/// Aborting is best-effort and idempotent; invoking a handle whose
/// operation has already settled is a no-op.
pub struct CancelHandle {
    cancel: Box<dyn Fn() + Send + Sync>,
}

impl CancelHandle {
    /// Wrap an arbitrary abort action.
    pub fn new(cancel: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Wrap a tokio task abort handle.
    pub fn from_abort_handle(handle: AbortHandle) -> Self {
        Self::new(move || handle.abort())
    }

    /// Signal the underlying operation to abort.
    pub fn cancel(&self) {
        (self.cancel)();
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CancelHandle")
    }
}

/// A tracked in-flight request.
struct PendingEntry {
    /// Registration identity, used to guard settlement
    id: u64,
    /// Abort token for the underlying operation
    handle: CancelHandle,
}

/// Tracks in-flight requests by canonical key.
///
/// At most one entry exists per key: registering a colliding key cancels
/// the prior entry before the new one is tracked. All mutation happens in
/// short synchronous sections; cancel handles are invoked outside the
/// lock, so a handle may safely re-enter the registry.
pub struct RequestRegistry {
    /// Pending entries (key -> entry)
    pending: Mutex<HashMap<String, PendingEntry>>,
    /// Monotonic registration counter
    next_entry: AtomicU64,
}

impl RequestRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            next_entry: AtomicU64::new(0),
        }
    }

    /// Register a pending request, superseding any entry under the same key.
    ///
    /// The predecessor is cancelled before the new entry is tracked, under
    /// the registry lock, so its late settlement cannot be mistaken for the
    /// new request's. Returns the registration id for [`Self::settle`].
    pub fn add(&self, key: impl Into<String>, handle: CancelHandle) -> u64 {
        let key = key.into();
        let id = self.next_entry.fetch_add(1, Ordering::Relaxed);

        let superseded = {
            let mut pending = self.pending.lock().unwrap();
            let superseded = pending.remove(&key);
            pending.insert(key.clone(), PendingEntry { id, handle });
            superseded
        };

        if let Some(entry) = superseded {
            tracing::debug!("Superseding in-flight request {}", key);
            entry.handle.cancel();
        }

        id
    }

    /// Remove the entry for `key` without cancelling it.
    ///
    /// No-op if absent. Returns whether an entry was removed.
    pub fn remove(&self, key: &str) -> bool {
        self.pending.lock().unwrap().remove(key).is_some()
    }

    /// Remove the entry for `key` only if it still belongs to registration `id`.
    ///
    /// Settlement path for dispatchers: a request superseded or cancelled
    /// after its entry was replaced must not evict its successor.
    pub fn settle(&self, key: &str, id: u64) {
        let mut pending = self.pending.lock().unwrap();
        if pending.get(key).map_or(false, |entry| entry.id == id) {
            pending.remove(key);
        }
    }

    /// Cancel and remove the request matching (method, url, params).
    ///
    /// Silently a no-op when no matching entry exists.
    pub fn cancel(&self, method: &str, url: &str, params: Option<&Value>) {
        self.cancel_key(&request_key(method, url, params));
    }

    /// Cancel and remove the request registered under `key`, if any.
    pub fn cancel_key(&self, key: &str) {
        let entry = self.pending.lock().unwrap().remove(key);
        if let Some(entry) = entry {
            tracing::debug!("Cancelling in-flight request {}", key);
            entry.handle.cancel();
        }
    }

    /// Cancel every tracked request and clear the registry.
    ///
    /// Idempotent; safe to call on an empty registry.
    pub fn cancel_all(&self) {
        let entries: Vec<PendingEntry> = {
            let mut pending = self.pending.lock().unwrap();
            pending.drain().map(|(_, entry)| entry).collect()
        };

        if entries.is_empty() {
            return;
        }

        tracing::debug!("Cancelling {} in-flight request(s)", entries.len());
        for entry in entries {
            entry.handle.cancel();
        }
    }

    /// Number of tracked requests.
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    /// Whether an entry is tracked under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.pending.lock().unwrap().contains_key(key)
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
