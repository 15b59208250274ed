use crate::StoreError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for a key-value storage backend underneath the student store.
/// Keys are record ids; values are encoded documents.
pub trait StoreBackend: Send + Sync {
    /// Insert or overwrite a value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    /// Retrieve a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
    /// Visit every stored value. Order is backend-defined.
    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;
    /// Flush any buffered writes.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Configuration for selecting and building a backend.
///
/// # Example
/// ```
/// use roster::BackendConfig;
///
/// // In-memory (tests, throwaway instances)
/// let config = BackendConfig::in_memory();
///
/// // Redb file on disk
/// let config = BackendConfig::redb("/var/lib/roster/students.redb");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendConfig {
    /// Redb embedded database stored at `path`.
    ///
    /// Requires the `backend-redb` feature (enabled by default).
    Redb { path: String },
    /// A `HashMap` behind a lock. Contents are lost on drop.
    #[default]
    InMemory,
}

impl BackendConfig {
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    pub fn redb<P: Into<String>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    /// Build the backend this configuration describes.
    pub fn build(&self) -> Result<Box<dyn StoreBackend>, StoreError> {
        match self {
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Box::new(RedbBackend::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(StoreError::backend("redb backend disabled at compile time"))
                }
            }
        }
    }
}

/// An in-memory backend using a `RwLock` around a `HashMap`.
pub struct InMemoryBackend {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for InMemoryBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .remove(key);
        Ok(())
    }

    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        // Read lock is held for the whole scan.
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        for value in guard.values() {
            visitor(value)?;
        }
        Ok(())
    }
}

#[cfg(feature = "backend-redb")]
pub mod redb;

#[cfg(feature = "backend-redb")]
pub use self::redb::RedbBackend;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_put_get_delete() {
        let backend = InMemoryBackend::new();
        backend.put("k1", b"v1").unwrap();
        assert_eq!(backend.get("k1").unwrap(), Some(b"v1".to_vec()));

        backend.put("k1", b"v2").unwrap();
        assert_eq!(backend.get("k1").unwrap(), Some(b"v2".to_vec()));

        backend.delete("k1").unwrap();
        assert_eq!(backend.get("k1").unwrap(), None);
        backend.delete("k1").unwrap();
    }

    #[test]
    fn in_memory_scan_visits_every_value() {
        let backend = InMemoryBackend::new();
        backend.put("a", b"1").unwrap();
        backend.put("b", b"2").unwrap();

        let mut seen = Vec::new();
        backend
            .scan(&mut |value| {
                seen.push(value.to_vec());
                Ok(())
            })
            .unwrap();
        seen.sort();
        assert_eq!(seen, vec![b"1".to_vec(), b"2".to_vec()]);
    }

    #[test]
    fn scan_stops_on_visitor_error() {
        let backend = InMemoryBackend::new();
        backend.put("a", b"1").unwrap();
        backend.put("b", b"2").unwrap();

        let mut visits = 0;
        let result = backend.scan(&mut |_| {
            visits += 1;
            Err(StoreError::backend("stop"))
        });
        assert!(result.is_err());
        assert_eq!(visits, 1);
    }

    #[test]
    fn default_config_is_in_memory() {
        assert_eq!(BackendConfig::default(), BackendConfig::InMemory);
        assert!(BackendConfig::in_memory().build().is_ok());
    }
}
