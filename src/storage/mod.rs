pub mod codec;
pub mod json_file;
pub mod memory;

use std::sync::Arc;

use crate::core::errors::Result;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub const DEFAULT_KEY_PREFIX: &str = "squareone";

/// Abstraction over string-keyed persistence backends holding serialized collections.
///
/// Reads of a key that was never written return `Ok(None)`; only genuine I/O trouble is an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// Names of the three collection keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub transactions: String,
    pub budgets: String,
    pub goals: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim();
        let prefix = if prefix.is_empty() {
            DEFAULT_KEY_PREFIX
        } else {
            prefix
        };
        Self {
            transactions: format!("{prefix}_transactions"),
            budgets: format!("{prefix}_budgets"),
            goals: format!("{prefix}_goals"),
        }
    }

    /// Sibling key holding a rejected raw value.
    pub fn quarantine(key: &str) -> String {
        format!("{key}.corrupt")
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}
