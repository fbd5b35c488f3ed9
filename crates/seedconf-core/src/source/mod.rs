//! Configuration sources
//!
//! A source is anything that can produce a settings mapping. The store only
//! ever sees the [`Source`] trait; concrete adapters live in the submodules
//! and in [`crate::remote`].

mod env;
mod file;

pub use env::{DEFAULT_ENV_PREFIX, EnvSource};
pub use file::FileSource;

use crate::{Error, Result, Settings};
use serde_json::Value;
use std::path::Path;

/// A loader producing one settings mapping per call.
///
/// Implementations hold only their connection parameters and may be dropped
/// after a single `load`.
pub trait Source: Send + Sync {
    fn load(&self) -> Result<Settings>;

    /// Short label used in log output.
    fn describe(&self) -> &'static str {
        "source"
    }
}

/// Convert a parsed document into settings, requiring a top-level mapping.
pub(crate) fn into_settings(value: Value, path: &Path) -> Result<Settings> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(Error::NotATable {
            path: path.to_path_buf(),
        }),
    }
}
