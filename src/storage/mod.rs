//! Key/value persistence for catalogue snapshots
//!
//! Every collection is stored as one JSON array under a fixed key. The
//! shape of the records is not versioned: changing a persisted field is a
//! breaking change for existing data.

pub mod file;
pub mod memory;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Raw text store addressed by key
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend {
    /// Value stored under `key`, or `None` if nothing was ever written
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;
}

/// Serializing facade shared by the services
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend + Send + Sync>,
}

impl Storage {
    pub fn new<B>(backend: B) -> Self
    where
        B: StorageBackend + Send + Sync + 'static,
    {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Overwrite `key` with the given entities, in order
    pub fn save<T: Serialize>(&self, key: &str, entities: &[T]) -> AppResult<()> {
        let json = serde_json::to_string(entities)?;
        self.backend.set_item(key, &json).map_err(|e| {
            tracing::error!("Failed to persist {} entries under '{}': {}", entities.len(), key, e);
            e
        })?;
        tracing::debug!("Persisted {} entries under '{}'", entities.len(), key);
        Ok(())
    }

    /// Entities stored under `key`; an absent or blank value yields an empty list
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        match self.backend.get_item(key)? {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }
}
