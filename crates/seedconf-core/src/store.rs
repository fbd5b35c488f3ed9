//! Thread-safe settings store
//!
//! The store is the only place resolved settings are mutated. Every operation
//! takes the same mutex; sources are loaded before the lock is taken so slow
//! network or file I/O never blocks other readers.

use crate::source::Source;
use crate::{Result, Settings};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Key/value settings guarded by a single lock.
///
/// Merge order is the order of `load`/`merge` calls: later keys overwrite
/// earlier ones with no conflict detection.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: Mutex<Settings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `settings`.
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    // Every critical section is a single map operation, so a panic in another
    // holder cannot leave the map half-updated.
    fn guard(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load a source and merge its output into the store.
    ///
    /// The source runs outside the lock. If it fails, the store is unchanged.
    pub fn load(&self, source: &dyn Source) -> Result<()> {
        let loaded = source.load()?;
        tracing::debug!(source = source.describe(), keys = loaded.len(), "Merging source");
        self.merge(loaded);
        Ok(())
    }

    /// Merge a mapping into the store, overwriting existing keys.
    pub fn merge(&self, settings: Settings) {
        self.guard().extend(settings);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.guard().get(key).cloned()
    }

    /// Return the stored value, or `default` when the key is absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// String view of a value, for collaborators that expect text.
    ///
    /// Numbers and booleans are rendered; mappings, arrays and null are not.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.guard().insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.guard().contains_key(key)
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}
