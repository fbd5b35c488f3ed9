//! Environment variable source

use super::Source;
use crate::{Result, Settings};
use serde_json::Value;

/// Prefix selecting which environment variables become settings.
pub const DEFAULT_ENV_PREFIX: &str = "CONF_";

/// Imports every variable whose name starts with the prefix, name unchanged.
///
/// By default the live process environment is read at `load` time. A fixed
/// snapshot can be supplied instead with [`EnvSource::from_vars`].
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    vars: Option<Vec<(String, String)>>,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvSource {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            vars: None,
        }
    }

    /// Use a fixed set of variables instead of the process environment.
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn filter<I>(&self, vars: I) -> Settings
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter(|(key, _)| key.starts_with(&self.prefix))
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    }
}

impl Source for EnvSource {
    fn load(&self) -> Result<Settings> {
        let settings = match &self.vars {
            Some(vars) => self.filter(vars.iter().cloned()),
            // Non-UTF-8 variables cannot be settings keys or values; skip them
            None => self.filter(std::env::vars_os().filter_map(|(k, v)| {
                Some((k.into_string().ok()?, v.into_string().ok()?))
            })),
        };
        tracing::debug!(prefix = %self.prefix, count = settings.len(), "Loaded environment variables");
        Ok(settings)
    }

    fn describe(&self) -> &'static str {
        "env"
    }
}
