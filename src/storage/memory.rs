//! In-process backend, used by tests and ephemeral runs

use std::collections::HashMap;
use std::sync::RwLock;

use super::StorageBackend;
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| AppError::Internal("Memory storage lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| AppError::Internal("Memory storage lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
