//! Directory-backed storage: one `<key>.json` document per key

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::StorageBackend;
use crate::error::{AppError, AppResult};

const FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory
    pub fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::info!("File storage rooted at {:?}", root);
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::Storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.root.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Written to a temporary sibling first and renamed into place, so a
    /// crash mid-write never leaves a truncated document behind.
    ///
    /// The write blocks the calling thread. Documents are small and every
    /// mutation already runs under the services lock, so callers do not
    /// move it off the runtime.
    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!(".{}.{}.tmp", key, FILE_EXTENSION));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
