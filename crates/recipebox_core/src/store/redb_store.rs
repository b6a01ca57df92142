//! Key-value store backed by a single redb database file.

use super::KeyValueStore;
use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use redb::{ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Raw values keyed by storage key.
const KV: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Store persisting values in `<dir>/store.redb`.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<redb::Database>,
}

impl RedbStore {
    /// Open (or create) the database under `dir` and ensure the table exists.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the database is
    /// held by another process, or table initialization fails.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create store directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let db = redb::Database::create(dir.join(REDB_FILE_NAME))?;

        let write_txn = db.begin_write()?;
        write_txn.open_table(KV)?;
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV)?;
        let value = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
