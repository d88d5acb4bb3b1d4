use async_trait::async_trait;
use thiserror::Error;

/// Errors from a durable-store backend.
///
/// These never propagate past the notification store: a failed read degrades
/// to an empty collection, a failed write leaves the in-memory state intact.
#[derive(Debug, Error)]
pub enum DurableStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Key-value capability holding one serialized collection per named slot.
///
/// The slot is single-writer: exactly one store instance in the active process
/// owns it. Concurrent writers are not coordinated; the policy is
/// last-writer-wins.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the raw contents of a slot, `None` when the slot was never written.
    async fn read(&self, slot: &str) -> Result<Option<String>, DurableStoreError>;

    /// Replace the contents of a slot wholesale.
    async fn write(&self, slot: &str, contents: &str) -> Result<(), DurableStoreError>;

    /// Remove a slot entirely.
    async fn clear(&self, slot: &str) -> Result<(), DurableStoreError>;
}
