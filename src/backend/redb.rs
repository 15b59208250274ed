//! Redb backend for the student store.
//!
//! Redb is a pure Rust embedded key-value store with ACID transactions. Each
//! `put`/`delete` is its own committed write transaction, so a write is
//! durable once the call returns.

use crate::{StoreBackend, StoreError};
use ::redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Documents keyed by student id.
const STUDENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("students");

/// Redb backend for persistent storage.
///
/// Redb does its own locking and MVCC; the `Arc<Database>` is shared freely.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a database file and make sure the table exists.
    ///
    /// ```no_run
    /// use roster::RedbBackend;
    ///
    /// let backend = RedbBackend::open("/tmp/students.redb").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(StoreError::backend)?;

        let write_txn = db.begin_write().map_err(StoreError::backend)?;
        {
            let _table = write_txn
                .open_table(STUDENTS_TABLE)
                .map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl StoreBackend for RedbBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(StoreError::backend)?;
        {
            let mut table = write_txn
                .open_table(STUDENTS_TABLE)
                .map_err(StoreError::backend)?;
            table.insert(key, value).map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self.db.begin_read().map_err(StoreError::backend)?;
        let table = read_txn
            .open_table(STUDENTS_TABLE)
            .map_err(StoreError::backend)?;

        Ok(table
            .get(key)
            .map_err(StoreError::backend)?
            .map(|value| value.value().to_vec()))
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(StoreError::backend)?;
        {
            let mut table = write_txn
                .open_table(STUDENTS_TABLE)
                .map_err(StoreError::backend)?;
            table.remove(key).map_err(StoreError::backend)?;
        }
        write_txn.commit().map_err(StoreError::backend)?;
        Ok(())
    }

    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let read_txn = self.db.begin_read().map_err(StoreError::backend)?;
        let table = read_txn
            .open_table(STUDENTS_TABLE)
            .map_err(StoreError::backend)?;

        for item in table.iter().map_err(StoreError::backend)? {
            let (_, value) = item.map_err(StoreError::backend)?;
            visitor(value.value())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn redb_backend_roundtrip() {
        let file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(file.path()).unwrap();

        backend.put("key1", b"value1").unwrap();
        assert_eq!(backend.get("key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(backend.get("missing").unwrap(), None);
    }

    #[test]
    fn redb_backend_delete() {
        let file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(file.path()).unwrap();

        backend.put("key1", b"value1").unwrap();
        backend.delete("key1").unwrap();
        assert_eq!(backend.get("key1").unwrap(), None);
    }

    #[test]
    fn redb_backend_persists_across_reopen() {
        let file = NamedTempFile::new().unwrap();
        {
            let backend = RedbBackend::open(file.path()).unwrap();
            backend.put("key1", b"value1").unwrap();
            backend.put("key2", b"value2").unwrap();
        }

        let backend = RedbBackend::open(file.path()).unwrap();
        let mut collected = Vec::new();
        backend
            .scan(&mut |value| {
                collected.push(value.to_vec());
                Ok(())
            })
            .unwrap();

        assert_eq!(collected.len(), 2);
        assert!(collected.contains(&b"value1".to_vec()));
        assert!(collected.contains(&b"value2".to_vec()));
    }
}
