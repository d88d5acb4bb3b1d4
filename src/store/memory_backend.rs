//! In-memory durable-store backend using DashMap.
//!
//! Slots live for the lifetime of the process and are lost on restart. Used as
//! the default backend and throughout the test suites.

use async_trait::async_trait;
use dashmap::DashMap;

use super::durable::{DurableStore, DurableStoreError};

/// In-memory slot storage.
#[derive(Default)]
pub struct MemoryDurableStore {
    slots: DashMap<String, String>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Pre-populate a slot, bypassing the trait. Handy for rehydration tests.
    pub fn seed(&self, slot: &str, contents: impl Into<String>) {
        self.slots.insert(slot.to_string(), contents.into());
    }
}

#[async_trait]
impl DurableStore for MemoryDurableStore {
    async fn read(&self, slot: &str) -> Result<Option<String>, DurableStoreError> {
        Ok(self.slots.get(slot).map(|entry| entry.clone()))
    }

    async fn write(&self, slot: &str, contents: &str) -> Result<(), DurableStoreError> {
        self.slots.insert(slot.to_string(), contents.to_string());
        tracing::debug!(slot = %slot, bytes = contents.len(), "Slot written");
        Ok(())
    }

    async fn clear(&self, slot: &str) -> Result<(), DurableStoreError> {
        self.slots.remove(slot);
        Ok(())
    }
}
