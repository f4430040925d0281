//! Keyed record storage.
//!
//! Each record kind lives in its own repository. Values are replaced
//! wholesale on write; readers always get owned copies.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("repository lock poisoned")]
    Poisoned,
}

/// Key/value store abstraction for domain records.
pub trait Repository<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn upsert(&self, key: K, value: V) -> Result<(), RepositoryError>;
    fn remove(&self, key: &K) -> Result<Option<V>, RepositoryError>;
    /// All records, ordered by key.
    fn list(&self) -> Vec<V>;
    fn keys(&self) -> Vec<K>;
}

impl<K, V, S> Repository<K, V> for Arc<S>
where
    S: Repository<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) -> Result<(), RepositoryError> {
        (**self).upsert(key, value)
    }

    fn remove(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        (**self).remove(key)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn keys(&self) -> Vec<K> {
        (**self).keys()
    }
}

/// In-memory repository (the only backend; state is process-local).
#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryRepository<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryRepository<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Clone + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.remove(key))
    }

    fn list(&self) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.values().cloned().collect()
    }

    fn keys(&self) -> Vec<K> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.keys().cloned().collect()
    }
}
