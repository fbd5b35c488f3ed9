//! Secrets cache file access
//!
//! The cache mirrors remote secrets locally, one top-level table per
//! environment:
//!
//! ```toml
//! [dev]
//! db_password = "..."
//! ```

use crate::{Error, Result, Settings};
use seedconf_fs::{ConfigStore, NormalizedPath};
use serde_json::Value;
use std::collections::BTreeMap;

/// Every environment entry in the cache file. A missing file has none.
pub fn read_entries(path: &NormalizedPath) -> Result<BTreeMap<String, Value>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let document: Value = ConfigStore::new().load(path)?;
    match document {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(Error::NotATable {
            path: path.to_native(),
        }),
    }
}

/// The entry for `environment`, if the cache has one.
pub fn read_entry(path: &NormalizedPath, environment: &str) -> Result<Option<Settings>> {
    match read_entries(path)?.remove(environment) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.into_iter().collect())),
        Some(_) => Err(Error::InvalidSection {
            path: path.to_native(),
            section: environment.to_string(),
        }),
    }
}

/// Replace the whole cache file with a single entry for `environment`.
///
/// TOML has no null, so null values are left out of the cache, at any depth.
pub fn overwrite(path: &NormalizedPath, environment: &str, secrets: &Settings) -> Result<()> {
    let storable: Settings = secrets
        .iter()
        .filter_map(|(key, value)| Some((key.clone(), without_nulls(value)?)))
        .collect();
    let dropped = secrets.len() - storable.len();
    if dropped > 0 {
        tracing::debug!(cache = %path, environment, dropped, "Null secrets not cached");
    }

    let mut document = BTreeMap::new();
    document.insert(environment, &storable);
    ConfigStore::new().save(path, &document)?;
    Ok(())
}

fn without_nulls(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => Some(Value::Object(
            map.iter()
                .filter_map(|(k, v)| Some((k.clone(), without_nulls(v)?)))
                .collect(),
        )),
        Value::Array(items) => Some(Value::Array(items.iter().filter_map(without_nulls).collect())),
        other => Some(other.clone()),
    }
}
