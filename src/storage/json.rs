//! JSON file-based key-value store.
//!
//! Values are kept in memory and written through to a small JSON document on
//! every mutation. Writes go to a temporary file that is then renamed over the
//! target, so a crash never leaves a half-written token file behind.

use crate::domain::error::{CinelistError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// A stored value with the time it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredItem {
    value: String,
    /// Unix timestamp of the last write.
    updated_at: i64,
}

/// Top-level document serialized to disk.
///
/// ```json
/// {
///   "version": 1,
///   "items": {
///     "token": { "value": "eyJhbGciOi...", "updated_at": 1718000000 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,
    #[serde(default)]
    items: HashMap<String, StoredItem>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            items: HashMap::new(),
        }
    }
}

/// JSON file key-value store.
///
/// This type is `Send + Sync` and meant to be owned by a single
/// [`SessionStore`](crate::session::SessionStore), which serializes access.
#[derive(Debug)]
pub struct JsonKeyValueStore {
    file_path: PathBuf,
    data: StorageData,
}

impl JsonKeyValueStore {
    /// Opens the store at `file_path`, loading existing contents if present.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but is not valid JSON.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cinelist::storage::JsonKeyValueStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonKeyValueStore::open(PathBuf::from("/tmp/cinelist/session.json"))?;
    /// # Ok::<(), cinelist::CinelistError>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening key-value store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no existing store, starting empty");
            StorageData::default()
        };

        Ok(Self { file_path, data })
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| CinelistError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != FORMAT_VERSION {
            tracing::warn!(version = data.version, "unexpected store version, reading anyway");
        }
        tracing::debug!(items = data.items.len(), "loaded key-value store");
        Ok(data)
    }

    fn save_to_file(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| CinelistError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::trace!(path = ?self.file_path, "key-value store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.items.get(key).map(|item| item.value.clone()))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set_item", key = %key).entered();

        self.data.items.insert(
            key.to_string(),
            StoredItem {
                value: value.to_string(),
                updated_at: chrono::Utc::now().timestamp(),
            },
        );
        self.save_to_file()
    }

    fn clear(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear").entered();

        if self.data.items.is_empty() && !self.file_path.exists() {
            return Ok(());
        }
        self.data.items.clear();
        self.save_to_file()
    }
}
