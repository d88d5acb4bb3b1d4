//! Durable notification collection.
//!
//! [`NotificationStore`] owns the ordered set of notification records. The
//! in-memory collection is copy-on-write: every mutation builds the next
//! version and swaps a shared `Arc`, so readers always hold a complete,
//! stable snapshot and a `list()` racing a mutation never observes a
//! half-updated collection.
//!
//! Durability is best-effort. Every mutation serializes the new snapshot and
//! hands it to the configured [`DurableStore`] backend on a spawned task; a
//! failed write keeps the in-memory collection intact for the session. On
//! startup [`NotificationStore::load`] rehydrates from the slot and degrades a
//! corrupt or missing slot to an empty collection instead of failing.

mod durable;
mod factory;
mod file_backend;
mod memory_backend;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::{NotificationError, Result};
use crate::notification::{Notification, NotificationCategory, NotificationPayload};

pub use durable::{DurableStore, DurableStoreError};
pub use factory::create_durable_store;
pub use file_backend::FileDurableStore;
pub use memory_backend::MemoryDurableStore;

/// Capacity of the store change feed
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change events emitted after each committed mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Appended(Uuid),
    MarkedRead(Uuid),
    MarkedAllRead,
    Removed(Uuid),
    Cleared,
}

/// Read restriction for [`NotificationStore::list`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter {
    /// Restrict to one category
    pub category: Option<NotificationCategory>,
    /// Restrict to unread records
    pub unread_only: bool,
}

impl ListFilter {
    pub fn unread() -> Self {
        Self {
            unread_only: true,
            ..Self::default()
        }
    }

    pub fn category(category: NotificationCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    fn matches(&self, record: &Notification) -> bool {
        if self.unread_only && record.is_read {
            return false;
        }
        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }
        true
    }
}

/// Owner of the durable, ordered notification collection.
///
/// Canonical read order is newest first. The store is the sole writer of
/// records; presentation layers mutate only through the read-flag and
/// removal intents exposed here.
pub struct NotificationStore {
    collection: RwLock<Arc<Vec<Notification>>>,
    backend: Arc<dyn DurableStore>,
    slot: String,
    events: broadcast::Sender<StoreEvent>,
    /// Bumped per scheduled write; a spawned write whose epoch is no longer
    /// current has been superseded and skips, so a slow stale write can never
    /// land after a newer one.
    persist_epoch: Arc<AtomicU64>,
}

impl NotificationStore {
    /// Create an empty store writing to the given slot.
    pub fn new(backend: Arc<dyn DurableStore>, slot: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            collection: RwLock::new(Arc::new(Vec::new())),
            backend,
            slot: slot.into(),
            events,
            persist_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a store rehydrated from its durable slot.
    ///
    /// A missing slot yields an empty collection. A corrupt slot is logged
    /// and likewise degrades to empty; startup never fails on bad state.
    pub async fn load(backend: Arc<dyn DurableStore>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let records = match backend.read(&slot).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Notification>>(&raw) {
                Ok(records) => {
                    tracing::info!(
                        slot = %slot,
                        count = records.len(),
                        "Rehydrated notification collection"
                    );
                    records
                }
                Err(e) => {
                    let err = NotificationError::Corruption(e);
                    tracing::warn!(
                        slot = %slot,
                        error = %err,
                        "Durable slot corrupt, starting with empty collection"
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    slot = %slot,
                    error = %e,
                    "Failed to read durable slot, starting with empty collection"
                );
                Vec::new()
            }
        };

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            collection: RwLock::new(Arc::new(records)),
            backend,
            slot,
            events,
            persist_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Append a notification built from the payload.
    ///
    /// Validates the payload before any mutation, inserts the record at the
    /// head of the collection, schedules a durable write, and returns the new
    /// id. `InvalidPayload` is the only error path.
    pub fn append(&self, payload: NotificationPayload) -> Result<Uuid> {
        payload.validate()?;

        let record = Notification::from_payload(payload);
        let id = record.id;

        let snapshot = {
            let mut guard = self.collection.write().expect("collection lock poisoned");
            let mut next = Vec::with_capacity(guard.len() + 1);
            next.push(record);
            next.extend(guard.iter().cloned());
            *guard = Arc::new(next);
            Arc::clone(&guard)
        };

        tracing::debug!(
            notification_id = %id,
            count = snapshot.len(),
            "Notification appended"
        );
        self.schedule_persist(snapshot);
        let _ = self.events.send(StoreEvent::Appended(id));
        Ok(id)
    }

    /// Flip the read flag for one record.
    ///
    /// A missing id is a no-op, not an error: presentation layers may race
    /// with a clear-all. Returns whether a record actually changed.
    pub fn mark_as_read(&self, id: Uuid) -> bool {
        let changed = self.commit(|records| {
            match records.iter_mut().find(|r| r.id == id && !r.is_read) {
                Some(record) => {
                    record.is_read = true;
                    true
                }
                None => false,
            }
        });

        if changed {
            let _ = self.events.send(StoreEvent::MarkedRead(id));
        }
        changed
    }

    /// Mark every record as read. Returns the number of records flipped.
    pub fn mark_all_as_read(&self) -> usize {
        let mut flipped = 0;
        let changed = self.commit(|records| {
            for record in records.iter_mut().filter(|r| !r.is_read) {
                record.is_read = true;
                flipped += 1;
            }
            flipped > 0
        });

        if changed {
            let _ = self.events.send(StoreEvent::MarkedAllRead);
        }
        flipped
    }

    /// Delete one record. Missing ids are a no-op.
    pub fn remove(&self, id: Uuid) -> bool {
        let changed = self.commit(|records| {
            let before = records.len();
            records.retain(|r| r.id != id);
            records.len() != before
        });

        if changed {
            let _ = self.events.send(StoreEvent::Removed(id));
        }
        changed
    }

    /// Delete every record. Returns the number removed.
    pub fn clear_all(&self) -> usize {
        let mut removed = 0;
        let changed = self.commit(|records| {
            removed = records.len();
            records.clear();
            removed > 0
        });

        if changed {
            let _ = self.events.send(StoreEvent::Cleared);
        }
        removed
    }

    /// Records in canonical order (newest first), optionally filtered.
    pub fn list(&self, filter: ListFilter) -> Vec<Notification> {
        self.snapshot()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Stable snapshot of the full collection, newest first.
    pub fn snapshot(&self) -> Arc<Vec<Notification>> {
        Arc::clone(&self.collection.read().expect("collection lock poisoned"))
    }

    /// Count of unread records, recomputed from current state.
    pub fn unread_count(&self) -> usize {
        self.snapshot().iter().filter(|r| !r.is_read).count()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Subscribe to the change feed.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Serialize the current snapshot and await the durable write.
    ///
    /// Called at shutdown so the last mutations are not lost to a still
    /// in-flight fire-and-forget task. Failures are logged, never returned.
    pub async fn flush(&self) {
        let snapshot = self.snapshot();
        let contents = match serde_json::to_string(snapshot.as_ref()) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize notification collection");
                return;
            }
        };
        // Supersede any still-pending fire-and-forget write
        self.persist_epoch.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.backend.write(&self.slot, &contents).await {
            tracing::warn!(slot = %self.slot, error = %e, "Durable flush failed");
        }
    }

    /// Apply a mutation copy-on-write. The closure edits a clone of the
    /// collection and reports whether anything changed; unchanged clones are
    /// discarded without swapping or persisting.
    fn commit<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut Vec<Notification>) -> bool,
    {
        let snapshot = {
            let mut guard = self.collection.write().expect("collection lock poisoned");
            let mut next: Vec<Notification> = guard.as_ref().clone();
            if !mutate(&mut next) {
                return false;
            }
            *guard = Arc::new(next);
            Arc::clone(&guard)
        };

        self.schedule_persist(snapshot);
        true
    }

    /// Fire-and-forget durable write of a committed snapshot.
    ///
    /// Outside a tokio runtime the write is skipped; the in-memory collection
    /// stays correct and the next flush or mutation inside a runtime catches
    /// the slot up.
    fn schedule_persist(&self, snapshot: Arc<Vec<Notification>>) {
        let contents = match serde_json::to_string(snapshot.as_ref()) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize notification collection");
                return;
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let backend = Arc::clone(&self.backend);
                let slot = self.slot.clone();
                let epochs = Arc::clone(&self.persist_epoch);
                let epoch = epochs.fetch_add(1, Ordering::SeqCst) + 1;
                handle.spawn(async move {
                    if epochs.load(Ordering::SeqCst) != epoch {
                        // A newer snapshot is already on its way to the slot
                        return;
                    }
                    if let Err(e) = backend.write(&slot, &contents).await {
                        tracing::warn!(
                            slot = %slot,
                            error = %e,
                            "Durable write failed, collection kept in memory only"
                        );
                    }
                });
            }
            Err(_) => {
                tracing::debug!(slot = %self.slot, "No async runtime, skipping durable write");
            }
        }
    }
}
