//! Durable-store backend factory

use std::sync::Arc;

use crate::config::StoreSettings;

use super::durable::DurableStore;
use super::file_backend::FileDurableStore;
use super::memory_backend::MemoryDurableStore;

/// Create a durable-store backend based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend`
/// setting:
/// - `"file"`: Returns a `FileDurableStore` rooted at the configured path
/// - `"memory"` (default): Returns a `MemoryDurableStore`
pub fn create_durable_store(settings: &StoreSettings) -> Arc<dyn DurableStore> {
    match settings.backend.as_str() {
        "file" => {
            if let Some(path) = &settings.path {
                tracing::info!(
                    backend = "file",
                    path = %path.display(),
                    "Creating file durable store"
                );
                Arc::new(FileDurableStore::new(path))
            } else {
                tracing::warn!("File backend requested but no path configured, falling back to memory");
                Arc::new(MemoryDurableStore::new())
            }
        }
        "memory" => Arc::new(MemoryDurableStore::new()),
        other => {
            tracing::warn!(backend = %other, "Unknown durable store backend, falling back to memory");
            Arc::new(MemoryDurableStore::new())
        }
    }
}
