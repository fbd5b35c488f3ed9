//! Lazily initialized settings
//!
//! A process-wide settings handle that materializes its store on first use.
//! Every forwarded operation goes through [`LazySettings::store`].

use crate::source::Source;
use crate::store::SettingsStore;
use crate::{Result, Settings};
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Debug, Default)]
pub struct LazySettings {
    inner: OnceLock<SettingsStore>,
}

impl LazySettings {
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// The underlying store, created empty on first access.
    pub fn store(&self) -> &SettingsStore {
        self.inner.get_or_init(SettingsStore::new)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }

    pub fn load(&self, source: &dyn Source) -> Result<()> {
        self.store().load(source)
    }

    pub fn merge(&self, settings: Settings) {
        self.store().merge(settings);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.store().get(key)
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.store().get_or(key, default)
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.store().set(key, value);
    }

    pub fn clear(&self) {
        self.store().clear();
    }

    pub fn snapshot(&self) -> Settings {
        self.store().snapshot()
    }
}
