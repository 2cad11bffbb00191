//! Key-value storage abstraction.
//!
//! This module defines the [`KeyValueStore`] trait the session store writes
//! the token through. It mirrors the `getItem` / `setItem` / `clear` contract
//! of a mobile key-value store so the persistence medium stays swappable.

use crate::domain::error::Result;

/// Key under which the session token is stored.
pub const TOKEN_KEY: &str = "token";

/// Abstraction over a persistent string key-value store.
///
/// # Implementations
///
/// - [`JsonKeyValueStore`](super::JsonKeyValueStore): JSON file with atomic writes
/// - [`MemoryStore`](super::MemoryStore): process memory only
///
/// # Examples
///
/// ```
/// use cinelist::storage::{KeyValueStore, MemoryStore, TOKEN_KEY};
///
/// let mut store = MemoryStore::default();
/// store.set_item(TOKEN_KEY, "abc")?;
/// assert_eq!(store.get_item(TOKEN_KEY)?.as_deref(), Some("abc"));
/// store.clear()?;
/// assert!(store.get_item(TOKEN_KEY)?.is_none());
/// # Ok::<(), cinelist::CinelistError>(())
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Inserts or replaces a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear(&mut self) -> Result<()>;
}
