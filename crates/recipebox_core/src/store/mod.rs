//! Key-value persistence for local overrides and favorites.
//!
//! The catalog only needs `get`/`set` of opaque byte values under fixed keys,
//! so every backend implements [`KeyValueStore`] and callers hold an
//! `Arc<dyn KeyValueStore>`.

/// File-per-key backend.
pub mod file_store;
/// Typed JSON list bound to one key.
pub mod list;
/// In-process backend.
pub mod memory;
/// redb-backed default backend.
pub mod redb_store;

pub use file_store::FileStore;
pub use list::JsonList;
pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use std::sync::Arc;

/// Minimal byte-oriented key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError>;
}

/// Open the backend selected by `config`.
///
/// # Returns
/// A shared store handle rooted at `config.store_path`.
///
/// # Errors
/// Returns an error when the store directory or database cannot be opened.
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, AppError> {
    tracing::debug!(
        backend = %config.store_backend,
        path = %config.store_path,
        "opening local store"
    );
    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::Redb => Arc::new(RedbStore::open(&config.store_path)?),
        StoreBackend::File => Arc::new(FileStore::new(&config.store_path)),
        StoreBackend::Memory => Arc::new(MemoryStore::default()),
    };
    Ok(store)
}
